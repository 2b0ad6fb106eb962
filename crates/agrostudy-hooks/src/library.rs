//! PDF-library hook — metadata rows plus object-storage payloads.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use agrostudy_core::{
  Error, Result,
  gateway::Gateway,
  library::{NewPdfDocument, PdfDocument, PdfDocumentPatch},
  record::require,
  stats::{PdfStats, pdf_stats},
};

use crate::{ResourceHook, notify::Notifier, session::IdentityWatch};

/// Object-storage bucket for document payloads.
const PDF_BUCKET: &str = "pdf-library";

/// A document about to be uploaded.
#[derive(Debug, Clone)]
pub struct PdfUpload {
  pub title:       String,
  pub author:      Option<String>,
  pub file_name:   String,
  pub bytes:       Vec<u8>,
  pub category:    String,
  pub tags:        Vec<String>,
  pub description: Option<String>,
}

pub struct PdfLibraryHook<G: Gateway> {
  inner: ResourceHook<PdfDocument, G>,
}

impl<G: Gateway> PdfLibraryHook<G> {
  pub fn new(
    gateway: Arc<G>,
    identity: IdentityWatch,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    Self { inner: ResourceHook::new(gateway, identity, notifier) }
  }

  pub async fn sync(&self) -> Result<()> { self.inner.sync().await }

  pub async fn list(&self) -> Result<()> { self.inner.list().await }

  pub async fn refresh(&self) -> Result<()> { self.inner.refresh().await }

  pub async fn items(&self) -> Vec<PdfDocument> { self.inner.items().await }

  /// Store the payload first, then the metadata row pointing at it. The
  /// create-intent guard is held across both steps, so a double click
  /// fails before any bytes are transferred.
  pub async fn upload(&self, upload: PdfUpload) -> Result<PdfDocument> {
    let guard = self.inner.begin_create()?;
    let identity = self
      .inner
      .identity()
      .current()
      .ok_or(Error::NoIdentity)?;

    // Validate before the payload leaves the device.
    if let Err(e) = require("title", &upload.title)
      .and_then(|()| require("file_name", &upload.file_name))
    {
      self.inner.notifier().error(&e.to_string());
      return Err(e);
    }

    let storage_path =
      format!("{}/{}-{}", identity.id, Uuid::new_v4(), upload.file_name);
    let size_bytes = upload.bytes.len() as u64;

    let gateway = self.inner.gateway();
    if let Err(e) = gateway
      .upload_object(PDF_BUCKET, &storage_path, upload.bytes)
      .await
    {
      tracing::warn!(error = %e, "document upload failed");
      self.inner.notifier().error("failed to upload document");
      return Err(Error::remote(e));
    }

    self
      .inner
      .create_with(
        NewPdfDocument {
          title: upload.title,
          author: upload.author,
          file_name: upload.file_name,
          storage_path,
          size_bytes,
          category: upload.category,
          tags: upload.tags,
          description: upload.description,
        },
        guard,
      )
      .await
  }

  pub async fn update(
    &self,
    id: Uuid,
    patch: PdfDocumentPatch,
  ) -> Result<PdfDocument> {
    self.inner.update(id, patch).await
  }

  pub async fn toggle_favorite(&self, id: Uuid) -> Result<PdfDocument> {
    let favorite = self
      .inner
      .with_items(|docs| {
        docs.iter().find(|d| d.id == id).map(|d| d.favorite)
      })
      .await
      .ok_or(Error::NotFound(id))?;

    self
      .inner
      .update(
        id,
        PdfDocumentPatch { favorite: Some(!favorite), ..Default::default() },
      )
      .await
  }

  /// Two-phase delete: the stored object first (a failure there is logged
  /// and skipped), then the metadata row (a failure there aborts and is
  /// reported). The collection and statistics change only once the
  /// metadata delete has succeeded.
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    let doc = self
      .inner
      .with_items(|docs| docs.iter().find(|d| d.id == id).cloned())
      .await
      .ok_or(Error::NotFound(id))?;

    if let Err(e) = self
      .inner
      .gateway()
      .delete_object(PDF_BUCKET, &doc.storage_path)
      .await
    {
      tracing::warn!(document = %id, error = %e, "document object delete failed");
    }

    self.inner.delete(id).await
  }

  /// Public URL for a document's payload, if the document is loaded.
  pub async fn download_url(&self, id: Uuid) -> Option<String> {
    let path = self
      .inner
      .with_items(|docs| {
        docs.iter().find(|d| d.id == id).map(|d| d.storage_path.clone())
      })
      .await?;
    Some(self.inner.gateway().public_url(PDF_BUCKET, &path))
  }

  /// Derived statistics over the current collection, as of `now`.
  pub async fn stats(&self, now: DateTime<Utc>) -> PdfStats {
    self.inner.with_items(|docs| pdf_stats(docs, now)).await
  }
}
