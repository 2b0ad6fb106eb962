//! PdfDocument — PDF-library metadata. The binary payload lives in object
//! storage; the row is metadata only.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  record::{Draft, Resource, require},
};

/// A document in the PDF library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfDocument {
  pub id:           Uuid,
  pub owner_id:     Uuid,
  pub title:        String,
  pub author:       Option<String>,
  /// The file name the document was uploaded with.
  pub file_name:    String,
  pub storage_path: String,
  pub size_bytes:   u64,
  pub category:     String,
  pub tags:         Vec<String>,
  pub description:  Option<String>,
  pub favorite:     bool,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl Resource for PdfDocument {
  type Draft = NewPdfDocument;
  type Patch = PdfDocumentPatch;

  const COLLECTION: &'static str = "pdf_library";
  const LABEL: &'static str = "document";

  fn id(&self) -> Uuid { self.id }

  fn owner_id(&self) -> Uuid { self.owner_id }

  /// Newest created first.
  fn order(a: &Self, b: &Self) -> Ordering {
    b.created_at.cmp(&a.created_at)
  }
}

/// Metadata for a document whose bytes the library hook uploads before
/// inserting this row.
#[derive(Debug, Clone)]
pub struct NewPdfDocument {
  pub title:        String,
  pub author:       Option<String>,
  pub file_name:    String,
  pub storage_path: String,
  pub size_bytes:   u64,
  pub category:     String,
  pub tags:         Vec<String>,
  pub description:  Option<String>,
}

impl Draft for NewPdfDocument {
  type Resource = PdfDocument;

  fn validate(&self) -> Result<()> {
    require("title", &self.title)?;
    require("file_name", &self.file_name)?;
    require("storage_path", &self.storage_path)
  }

  fn into_resource(
    self,
    id: Uuid,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> PdfDocument {
    PdfDocument {
      id,
      owner_id,
      title: self.title,
      author: self.author,
      file_name: self.file_name,
      storage_path: self.storage_path,
      size_bytes: self.size_bytes,
      category: self.category,
      tags: self.tags,
      description: self.description,
      favorite: false,
      created_at: now,
      updated_at: now,
    }
  }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PdfDocumentPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category:    Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tags:        Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub favorite:    Option<bool>,
}
