//! [`SqliteGateway`] — the SQLite implementation of the gateway contract.

use std::path::Path;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use chrono::Utc;
use rand_core::OsRng;
use rusqlite::OptionalExtension as _;
use serde_json::Value;
use uuid::Uuid;

use agrostudy_core::{
  gateway::{AuthGateway, Gateway},
  identity::{Identity, NewIdentity},
};

use crate::{
  Error, GatewayConfig, Result,
  encode::{RawUser, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An AgroStudy backend stored in a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteGateway {
  conn:     tokio_rusqlite::Connection,
  base_url: String,
}

impl SqliteGateway {
  /// Open (or create) a store per `config` and run schema initialisation.
  pub async fn open(config: &GatewayConfig) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(&config.db_path).await?;
    let store = Self {
      conn,
      base_url: config.object_base_url.trim_end_matches('/').to_string(),
    };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, base_url: "local://agrostudy".to_string() };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Open a store at `path` with the default object base URL.
  pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
    let config = GatewayConfig {
      db_path:         path.as_ref().to_path_buf(),
      object_base_url: "local://agrostudy".to_string(),
    };
    Self::open(&config).await
  }

  fn row_key(row: &Value, key: &str) -> Result<Uuid> {
    let raw = row
      .get(key)
      .and_then(Value::as_str)
      .ok_or_else(|| Error::InvalidRow(format!("missing {key}")))?;
    Ok(Uuid::parse_str(raw)?)
  }
}

// ─── Gateway impl ────────────────────────────────────────────────────────────

impl Gateway for SqliteGateway {
  type Error = Error;

  async fn fetch_all(&self, collection: &str, owner: Uuid) -> Result<Vec<Value>> {
    let collection = collection.to_owned();
    let owner_str = encode_uuid(owner);

    let payloads: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT payload FROM rows
           WHERE collection = ?1 AND owner_id = ?2
           ORDER BY created_at",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![collection, owner_str], |row| {
            row.get(0)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    payloads
      .iter()
      .map(|p| serde_json::from_str(p).map_err(Error::Json))
      .collect()
  }

  async fn insert(&self, collection: &str, row: Value) -> Result<Value> {
    let id = Self::row_key(&row, "id")?;
    let owner = Self::row_key(&row, "owner_id")?;

    let now = Utc::now();
    let now_str = encode_dt(now);

    // The store is authoritative for both timestamps.
    let mut row = row;
    let obj = row
      .as_object_mut()
      .ok_or_else(|| Error::InvalidRow("row is not an object".into()))?;
    obj.insert("created_at".into(), Value::String(now_str.clone()));
    obj.insert("updated_at".into(), Value::String(now_str.clone()));

    let payload = serde_json::to_string(&row)?;
    let collection_owned = collection.to_owned();
    let id_str = encode_uuid(id);
    let owner_str = encode_uuid(owner);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO rows (collection, id, owner_id, created_at, updated_at, payload)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            collection_owned,
            id_str,
            owner_str,
            now_str,
            now_str,
            payload,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(collection, %id, "row inserted");
    Ok(row)
  }

  async fn update(
    &self,
    collection: &str,
    id: Uuid,
    owner: Uuid,
    patch: Value,
  ) -> Result<Value> {
    let patch_obj = match patch {
      Value::Object(map) => map,
      _ => return Err(Error::InvalidRow("patch is not an object".into())),
    };

    let collection_owned = collection.to_owned();
    let id_str = encode_uuid(id);
    let owner_str = encode_uuid(owner);

    let stored: Option<String> = {
      let (collection, id_str, owner_str) =
        (collection_owned.clone(), id_str.clone(), owner_str.clone());
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT payload FROM rows
                 WHERE collection = ?1 AND id = ?2 AND owner_id = ?3",
                rusqlite::params![collection, id_str, owner_str],
                |row| row.get(0),
              )
              .optional()?,
          )
        })
        .await?
    };

    let stored = stored.ok_or(Error::RowNotFound(id))?;
    let mut row: Value = serde_json::from_str(&stored)?;
    let obj = row
      .as_object_mut()
      .ok_or_else(|| Error::InvalidRow("stored row is not an object".into()))?;

    for (key, value) in patch_obj {
      obj.insert(key, value);
    }

    let now_str = encode_dt(Utc::now());
    obj.insert("updated_at".into(), Value::String(now_str.clone()));

    let payload = serde_json::to_string(&row)?;
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE rows SET payload = ?1, updated_at = ?2
           WHERE collection = ?3 AND id = ?4 AND owner_id = ?5",
          rusqlite::params![payload, now_str, collection_owned, id_str, owner_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(collection, %id, "row updated");
    Ok(row)
  }

  async fn delete(&self, collection: &str, id: Uuid, owner: Uuid) -> Result<()> {
    let collection_owned = collection.to_owned();
    let id_str = encode_uuid(id);
    let owner_str = encode_uuid(owner);

    let affected: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM rows
           WHERE collection = ?1 AND id = ?2 AND owner_id = ?3",
          rusqlite::params![collection_owned, id_str, owner_str],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::RowNotFound(id));
    }
    tracing::debug!(collection, %id, "row deleted");
    Ok(())
  }

  async fn upload_object(
    &self,
    bucket: &str,
    path: &str,
    bytes: Vec<u8>,
  ) -> Result<()> {
    let bucket = bucket.to_owned();
    let path = path.to_owned();
    let now_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO objects (bucket, path, bytes, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![bucket, path, bytes, now_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_object(&self, bucket: &str, path: &str) -> Result<()> {
    let bucket_owned = bucket.to_owned();
    let path_owned = path.to_owned();

    let affected: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM objects WHERE bucket = ?1 AND path = ?2",
          rusqlite::params![bucket_owned, path_owned],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::ObjectNotFound(format!("{bucket}/{path}")));
    }
    Ok(())
  }

  fn public_url(&self, bucket: &str, path: &str) -> String {
    format!("{}/{bucket}/{path}", self.base_url)
  }
}

// ─── AuthGateway impl ────────────────────────────────────────────────────────

impl AuthGateway for SqliteGateway {
  type Error = Error;

  async fn sign_up(&self, input: NewIdentity) -> Result<Identity> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(input.password.as_bytes(), &salt)
      .map_err(|e| Error::PasswordHash(e.to_string()))?
      .to_string();

    let identity = Identity {
      id:           Uuid::new_v4(),
      email:        input.email.clone(),
      display_name: input.display_name.clone(),
      created_at:   Utc::now(),
    };

    let id_str = encode_uuid(identity.id);
    let at_str = encode_dt(identity.created_at);
    let email = input.email.clone();
    let display_name = input.display_name;

    let taken: bool = self
      .conn
      .call(move |conn| {
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if exists {
          return Ok(true);
        }

        conn.execute(
          "INSERT INTO users (user_id, email, display_name, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, email, display_name, hash, at_str],
        )?;
        Ok(false)
      })
      .await?;

    if taken {
      return Err(Error::EmailTaken(input.email));
    }
    Ok(identity)
  }

  async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
    let email_owned = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, email, display_name, password_hash, created_at
               FROM users WHERE email = ?1",
              rusqlite::params![email_owned],
              |row| {
                Ok(RawUser {
                  user_id:       row.get(0)?,
                  email:         row.get(1)?,
                  display_name:  row.get(2)?,
                  password_hash: row.get(3)?,
                  created_at:    row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    let raw = raw.ok_or(Error::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&raw.password_hash)
      .map_err(|_| Error::InvalidCredentials)?;
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .map_err(|_| Error::InvalidCredentials)?;

    raw.into_identity()
  }
}
