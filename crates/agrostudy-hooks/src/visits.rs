//! Visits hook — the field-visit journal and its photos.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use agrostudy_core::{
  Error, Result,
  gateway::Gateway,
  record::Resource as _,
  stats::{VisitStats, visit_stats},
  visit::{
    NewVisit, NewVisitPhoto, Visit, VisitPatch, VisitPhoto, VisitPhotoPatch,
  },
};

use crate::{
  ResourceHook, notify::Notifier, session::IdentityWatch,
  subjects::subject_refs,
};

/// Object-storage bucket for visit photos.
const PHOTO_BUCKET: &str = "visit-photos";

/// A photo captured in the field, about to be uploaded.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
  pub file_name:   String,
  pub bytes:       Vec<u8>,
  pub caption:     Option<String>,
  pub captured_at: DateTime<Utc>,
  pub exif:        Option<serde_json::Value>,
}

pub struct VisitsHook<G: Gateway> {
  visits: ResourceHook<Visit, G>,
  photos: ResourceHook<VisitPhoto, G>,
}

impl<G: Gateway> VisitsHook<G> {
  pub fn new(
    gateway: Arc<G>,
    identity: IdentityWatch,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    Self {
      visits: ResourceHook::new(
        gateway.clone(),
        identity.clone(),
        notifier.clone(),
      ),
      photos: ResourceHook::new(gateway, identity, notifier),
    }
  }

  pub async fn sync(&self) -> Result<()> {
    self.visits.sync().await?;
    self.photos.sync().await?;
    self.enrich().await
  }

  /// Fetch all visits and photos, attach each visit's photos and resolved
  /// subject inline.
  pub async fn list(&self) -> Result<()> {
    self.visits.list().await?;
    self.photos.list().await?;
    self.enrich().await
  }

  pub async fn refresh(&self) -> Result<()> { self.list().await }

  pub async fn items(&self) -> Vec<Visit> { self.visits.items().await }

  pub async fn create(&self, draft: NewVisit) -> Result<Visit> {
    self.visits.create(draft).await
  }

  pub async fn update(&self, id: Uuid, patch: VisitPatch) -> Result<Visit> {
    self.visits.update(id, patch).await
  }

  /// Photos cannot outlive their visit: their rows (and stored objects)
  /// go first. A failed object delete is logged and skipped; a failed
  /// photo-row delete aborts before the visit itself is touched.
  pub async fn delete(&self, id: Uuid) -> Result<()> {
    let identity = self
      .visits
      .identity()
      .current()
      .ok_or(Error::NoIdentity)?;

    let doomed: Vec<VisitPhoto> = self
      .photos
      .with_items(|photos| {
        photos.iter().filter(|p| p.visit_id == id).cloned().collect()
      })
      .await;

    let gateway = self.visits.gateway();
    for photo in &doomed {
      if let Err(e) =
        gateway.delete_object(PHOTO_BUCKET, &photo.storage_path).await
      {
        tracing::warn!(photo = %photo.id, error = %e, "photo object delete failed");
      }
      if let Err(e) = gateway
        .delete(VisitPhoto::COLLECTION, photo.id, identity.id)
        .await
      {
        self.visits.notifier().error("failed to delete visit photos");
        return Err(Error::remote(e));
      }
    }

    self.visits.delete(id).await?;
    self
      .photos
      .with_items(|photos| photos.retain(|p| p.visit_id != id))
      .await;
    Ok(())
  }

  // ── Photos ────────────────────────────────────────────────────────────

  /// Upload the photo bytes, then record the metadata row pointing at the
  /// stored object. The create-intent guard is held across both steps, so
  /// a double click fails before any bytes are transferred.
  pub async fn add_photo(
    &self,
    visit_id: Uuid,
    upload: PhotoUpload,
  ) -> Result<VisitPhoto> {
    let guard = self.photos.begin_create()?;
    let identity = self
      .photos
      .identity()
      .current()
      .ok_or(Error::NoIdentity)?;

    let storage_path = format!(
      "{}/{}/{}-{}",
      identity.id,
      visit_id,
      Uuid::new_v4(),
      upload.file_name
    );

    let gateway = self.photos.gateway();
    if let Err(e) = gateway
      .upload_object(PHOTO_BUCKET, &storage_path, upload.bytes)
      .await
    {
      tracing::warn!(error = %e, "photo upload failed");
      self.photos.notifier().error("failed to upload photo");
      return Err(Error::remote(e));
    }

    let url = gateway.public_url(PHOTO_BUCKET, &storage_path);
    let photo = self
      .photos
      .create_with(
        NewVisitPhoto {
          visit_id,
          storage_path,
          url,
          caption: upload.caption,
          captured_at: upload.captured_at,
          exif: upload.exif,
        },
        guard,
      )
      .await?;

    self
      .visits
      .with_items(|visits| {
        if let Some(visit) = visits.iter_mut().find(|v| v.id == visit_id) {
          visit.photos.push(photo.clone());
        }
      })
      .await;
    Ok(photo)
  }

  pub async fn caption_photo(
    &self,
    photo_id: Uuid,
    caption: Option<String>,
  ) -> Result<VisitPhoto> {
    self
      .photos
      .update(photo_id, VisitPhotoPatch { caption })
      .await
  }

  /// Remove one photo: the stored object best-effort, the metadata row
  /// authoritatively.
  pub async fn remove_photo(&self, photo_id: Uuid) -> Result<()> {
    let photo = self
      .photos
      .with_items(|photos| {
        photos.iter().find(|p| p.id == photo_id).cloned()
      })
      .await
      .ok_or(Error::NotFound(photo_id))?;

    if let Err(e) = self
      .photos
      .gateway()
      .delete_object(PHOTO_BUCKET, &photo.storage_path)
      .await
    {
      tracing::warn!(photo = %photo_id, error = %e, "photo object delete failed");
    }

    self.photos.delete(photo_id).await?;
    self
      .visits
      .with_items(|visits| {
        if let Some(visit) =
          visits.iter_mut().find(|v| v.id == photo.visit_id)
        {
          visit.photos.retain(|p| p.id != photo_id);
        }
      })
      .await;
    Ok(())
  }

  /// Derived statistics over the current collection, as of `now`.
  pub async fn stats(&self, now: DateTime<Utc>) -> VisitStats {
    self.visits.with_items(|visits| visit_stats(visits, now)).await
  }

  async fn enrich(&self) -> Result<()> {
    let Some(identity) = self.visits.identity().current() else {
      return Ok(());
    };
    let refs =
      subject_refs(self.visits.gateway().as_ref(), identity.id).await?;

    let mut by_visit: HashMap<Uuid, Vec<VisitPhoto>> = HashMap::new();
    for photo in self.photos.items().await {
      by_visit.entry(photo.visit_id).or_default().push(photo);
    }

    self
      .visits
      .with_items(|visits| {
        for visit in visits {
          visit.subject =
            visit.subject_id.and_then(|id| refs.get(&id).cloned());
          visit.photos = by_visit.remove(&visit.id).unwrap_or_default();
        }
      })
      .await;
    Ok(())
  }
}
