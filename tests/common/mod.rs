#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use portfolio_store::media::data_uri;
use portfolio_store::storage::{ImageBlobEntry, ImageStore, MemoryImageStore};
use portfolio_store::{PortfolioError, Result};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A `data:image/png` payload of a `width` x `height` gradient.
pub fn png_data_uri(width: u32, height: u32) -> String {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x / 2 + y / 2) % 256) as u8])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    data_uri::encode("image/png", &bytes)
}

/// Dimensions of the image inside a `data:` URI.
pub fn dimensions_of(payload: &str) -> (u32, u32) {
    let bytes = data_uri::decode_image_bytes(payload).unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    (img.width(), img.height())
}

/// A syntactically valid inline payload of roughly `len` bytes that is not a real image.
pub fn opaque_payload(len: usize) -> String {
    format!("data:image/png;base64,{}", "A".repeat(len))
}

/// Image store that rejects writes for one project id.
#[derive(Debug, Default)]
pub struct FlakyImageStore {
    pub inner: MemoryImageStore,
    pub failing_id: String,
}

impl FlakyImageStore {
    pub fn failing_for(id: &str) -> Self {
        Self {
            inner: MemoryImageStore::default(),
            failing_id: id.to_string(),
        }
    }
}

#[async_trait]
impl ImageStore for FlakyImageStore {
    async fn put(&self, entry: &ImageBlobEntry) -> Result<()> {
        if entry.id == self.failing_id {
            return Err(PortfolioError::Storage(format!("write refused for {}", entry.id)));
        }
        self.inner.put(entry).await
    }

    async fn get(&self, id: &str) -> Result<Option<ImageBlobEntry>> {
        self.inner.get(id).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.inner.delete(id).await
    }
}

/// Image store whose reads fail for one project id.
#[derive(Debug, Default)]
pub struct UnreadableImageStore {
    pub inner: MemoryImageStore,
    pub failing_id: String,
}

impl UnreadableImageStore {
    pub fn failing_for(id: &str) -> Self {
        Self {
            inner: MemoryImageStore::default(),
            failing_id: id.to_string(),
        }
    }
}

#[async_trait]
impl ImageStore for UnreadableImageStore {
    async fn put(&self, entry: &ImageBlobEntry) -> Result<()> {
        self.inner.put(entry).await
    }

    async fn get(&self, id: &str) -> Result<Option<ImageBlobEntry>> {
        if id == self.failing_id {
            return Err(PortfolioError::Storage(format!("read failed for {id}")));
        }
        self.inner.get(id).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.inner.delete(id).await
    }
}

/// Image store that counts calls and yields once inside every write.
#[derive(Debug, Default)]
pub struct CountingImageStore {
    pub inner: MemoryImageStore,
    puts: AtomicUsize,
    gets: AtomicUsize,
}

impl CountingImageStore {
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageStore for CountingImageStore {
    async fn put(&self, entry: &ImageBlobEntry) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.inner.put(entry).await
    }

    async fn get(&self, id: &str) -> Result<Option<ImageBlobEntry>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.inner.delete(id).await
    }
}
