//! Fully-qualified references to immutable object versions.
//!
//! An [`ObjectRef`] is the only way to address a specific version of a named
//! object: `(entity, project, object_id, digest)`. Its URI form is
//!
//! ```text
//! vault:///<entity>/<project>/object/<object_id>:<digest>
//! ```
//!
//! Producing and parsing round-trip exactly. Resolving a ref must land on
//! the content that produced its digest, or fail NotFound; the ref itself is
//! an opaque identifier to callers.

use crate::digest::Digest;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// URI scheme for all TraceVault refs.
pub const REF_SCHEME: &str = "vault";

const REF_PREFIX: &str = "vault:///";
const OBJECT_KIND: &str = "object";

/// A reference to one immutable version of a named object.
///
/// Two refs are equal iff all four fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Owning entity (organization or user namespace)
    pub entity: String,
    /// Project within the entity
    pub project: String,
    /// Object name within the project
    pub object_id: String,
    /// Content digest of this version
    pub digest: Digest,
}

impl ObjectRef {
    /// Build a ref, validating segment contents.
    ///
    /// Segments must be non-empty and must not contain `/` or `:`, which
    /// would make the URI form ambiguous.
    pub fn new(
        entity: impl Into<String>,
        project: impl Into<String>,
        object_id: impl Into<String>,
        digest: Digest,
    ) -> Result<Self> {
        let r = ObjectRef {
            entity: entity.into(),
            project: project.into(),
            object_id: object_id.into(),
            digest,
        };
        for (name, seg) in [
            ("entity", &r.entity),
            ("project", &r.project),
            ("object_id", &r.object_id),
        ] {
            if seg.is_empty() {
                return Err(Error::Format(format!("empty {} segment", name)));
            }
            if seg.contains('/') || seg.contains(':') {
                return Err(Error::Format(format!(
                    "{} segment contains reserved character: {}",
                    name, seg
                )));
            }
        }
        Ok(r)
    }

    /// Parse a ref URI.
    ///
    /// Anything that does not match the
    /// `vault:///entity/project/object/object_id:digest` shape fails with
    /// [`Error::Format`].
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix(REF_PREFIX)
            .ok_or_else(|| Error::Format(format!("expected {} prefix: {}", REF_PREFIX, uri)))?;

        let segments: Vec<&str> = rest.split('/').collect();
        if segments.len() != 4 {
            return Err(Error::Format(format!(
                "expected 4 path segments, got {}: {}",
                segments.len(),
                uri
            )));
        }
        let (entity, project, kind, versioned) =
            (segments[0], segments[1], segments[2], segments[3]);
        if kind != OBJECT_KIND {
            return Err(Error::Format(format!(
                "expected '{}' kind segment, got '{}'",
                OBJECT_KIND, kind
            )));
        }

        let (object_id, digest_str) = versioned
            .split_once(':')
            .ok_or_else(|| Error::Format(format!("missing ':digest' suffix: {}", uri)))?;
        let digest = Digest::parse(digest_str)?;

        ObjectRef::new(entity, project, object_id, digest)
    }

    /// Render the URI form. Inverse of [`ObjectRef::parse`].
    pub fn to_uri(&self) -> String {
        format!(
            "{}{}/{}/{}/{}:{}",
            REF_PREFIX, self.entity, self.project, OBJECT_KIND, self.object_id, self.digest
        )
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uri())
    }
}
