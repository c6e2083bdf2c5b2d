//! Contact record types and their document-store wire mapping.
//!
//! The hosted document store keeps contact fields under the attribute names
//! the web client originally wrote (`contactNumber`, `imageUrl`, `userId`);
//! the serde renames below pin that format so records stay readable by both
//! clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::traits::documents::Document;

/// Gender attribute of a contact, a fixed enumerated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!(
                "unknown gender '{}', expected Male, Female or Other",
                s
            )),
        }
    }
}

/// One address-book entry as known to the in-memory collection.
///
/// `id` and `created_at` are assigned by the document store; `owner_id`
/// always equals the session's principal id under which the record was
/// fetched or created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub gender: Gender,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Contact attribute payload as stored in the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContactFields {
    name: String,
    address: String,
    #[serde(rename = "contactNumber")]
    phone: String,
    gender: Gender,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(rename = "userId")]
    owner_id: String,
}

impl Contact {
    /// Rebuild a contact from a raw document.
    ///
    /// Fails when the document's attributes do not match the contact schema.
    pub fn from_document(doc: &Document) -> Result<Self, serde_json::Error> {
        let fields: ContactFields = serde_json::from_value(doc.fields.clone())?;
        Ok(Self {
            id: doc.id.clone(),
            owner_id: fields.owner_id,
            name: fields.name,
            address: fields.address,
            phone: fields.phone,
            gender: fields.gender,
            image_url: fields.image_url,
            created_at: doc.created_at,
        })
    }
}

/// Caller-supplied fields for a new contact.
///
/// The server assigns the record identifier; the owner id travels separately
/// so the store can tag and permission the document (one struct payload plus
/// an explicit owner at every call site).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub gender: Gender,
    pub image_url: Option<String>,
}

impl ContactDraft {
    /// Serialize the draft to document attributes tagged with its owner.
    pub fn to_fields(&self, owner_id: &str) -> Value {
        let fields = ContactFields {
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            gender: self.gender,
            image_url: self.image_url.clone(),
            owner_id: owner_id.to_string(),
        };
        // ContactFields serialization cannot fail: string and enum fields only.
        serde_json::to_value(fields).unwrap_or(Value::Null)
    }
}

/// Partial field replacement for an existing contact.
///
/// Unset fields are omitted from the request body and keep their stored
/// values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "contactNumber", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ContactUpdate {
    /// An empty update (no fields change).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name field.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the address field.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the phone number field.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the gender field.
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Set the image URL field.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Serialize the changed fields only.
    pub fn to_fields(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
