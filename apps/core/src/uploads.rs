//! Upload collaborator.
//!
//! A client first asks for an upload target, then sends the bytes with a
//! single `PUT` to the returned URL. The token in the URL is random and
//! URL-safe; each target accepts exactly one write and is retired once the
//! write succeeds. The object path handed back is what a document record
//! stores in `fileUrl`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use tracing::{info, instrument, warn};
use url::Url;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::fs_manager::ObjectStore;

pub const OBJECT_PATH_PREFIX: &str = "/objects/uploads/";

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub size: u64,
    #[validate(length(min = 1))]
    pub content_type: String,
}

/// Where and how to send the bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub object_path: String,
}

#[derive(Debug)]
struct IssuedTarget {
    object_id: String,
    size: u64,
    /// A write for this target is in flight
    claimed: bool,
}

pub struct UploadService {
    public_url: Url,
    max_bytes: u64,
    objects: ObjectStore,
    issued: Mutex<HashMap<String, IssuedTarget>>,
}

fn new_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

impl UploadService {
    pub fn new(public_url: Url, max_bytes: u64, objects: ObjectStore) -> Self {
        Self {
            public_url,
            max_bytes,
            objects,
            issued: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    fn lock_issued(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, IssuedTarget>>, AppError> {
        self.issued
            .lock()
            .map_err(|e| AppError::Internal(format!("Upload registry poisoned: {}", e)))
    }

    /// Validates the request and issues a write-once target
    #[instrument(skip(self, request), fields(name = %request.name, size = request.size))]
    pub fn request_upload(&self, request: UploadRequest) -> Result<UploadTarget, AppError> {
        request.validate()?;
        if request.size == 0 || request.size > self.max_bytes {
            return Err(AppError::Upload(format!(
                "File size must be between 1 and {} bytes",
                self.max_bytes
            )));
        }

        let token = new_token();
        let object_id = Uuid::new_v4().to_string();
        let url = self.public_url.join(&format!("api/uploads/{}", token))?;

        self.lock_issued()?.insert(
            token,
            IssuedTarget {
                object_id: object_id.clone(),
                size: request.size,
                claimed: false,
            },
        );

        info!(object_id = %object_id, "Upload target issued");
        Ok(UploadTarget {
            method: "PUT".to_string(),
            url: url.to_string(),
            headers: BTreeMap::from([("Content-Type".to_string(), request.content_type)]),
            object_path: format!("{}{}", OBJECT_PATH_PREFIX, object_id),
        })
    }

    /// Stores the bytes for `token` and returns the object path.
    ///
    /// The target is forgotten once the bytes are stored, so a later write
    /// with the same token is `NotFound`. A write racing an in-flight one is
    /// a `Conflict`. A rejected or failed write leaves the target usable.
    #[instrument(skip(self, token, bytes), fields(size = bytes.len()))]
    pub async fn complete_upload(&self, token: &str, bytes: &[u8]) -> Result<String, AppError> {
        let object_id = {
            let mut issued = self.lock_issued()?;
            let target = issued
                .get_mut(token)
                .ok_or_else(|| AppError::NotFound("Unknown upload target".to_string()))?;
            if target.claimed {
                return Err(AppError::Conflict(
                    "Upload target is already being written".to_string(),
                ));
            }
            if bytes.len() as u64 != target.size {
                warn!(expected = target.size, "Upload size mismatch");
                return Err(AppError::Upload(format!(
                    "Expected {} bytes, received {}",
                    target.size,
                    bytes.len()
                )));
            }
            target.claimed = true;
            target.object_id.clone()
        };

        let written = self.objects.write_once(&object_id, bytes).await;

        let mut issued = self.lock_issued()?;
        match written {
            Ok(_) => {
                issued.remove(token);
                Ok(format!("{}{}", OBJECT_PATH_PREFIX, object_id))
            }
            Err(e) => {
                if let Some(target) = issued.get_mut(token) {
                    target.claimed = false;
                }
                Err(e)
            }
        }
    }

    /// Bytes of a stored upload, by the id at the end of its object path
    pub async fn read_object(&self, object_id: &str) -> Result<Vec<u8>, AppError> {
        self.objects.read(object_id).await
    }
}
