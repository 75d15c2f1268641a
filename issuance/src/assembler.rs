//! Metadata Assembler: brand form fields to the canonical document.

use serde::{Deserialize, Serialize};

use certum_ledger::MAX_NAME_LEN;
use certum_store::ImageAsset;
use certum_types::{
    Attribute, MetadataDocument, MetadataFile, MetadataProperties, ProductCategory, Published,
    TraitName,
};

use crate::AssemblyError;

/// What a brand fills in to issue a certificate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandSubmission {
    pub name: String,
    pub category: ProductCategory,
    pub serial: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip)]
    pub image: Option<ImageAsset>,
}

pub struct MetadataAssembler;

impl MetadataAssembler {
    /// Check required fields before anything is published.
    pub fn validate(submission: &BrandSubmission) -> Result<(), AssemblyError> {
        if submission.name.trim().is_empty() {
            return Err(AssemblyError::MissingField("name"));
        }
        if submission.serial.trim().is_empty() {
            return Err(AssemblyError::MissingField("serial"));
        }
        if matches!(&submission.image, Some(image) if image.bytes.is_empty()) {
            return Err(AssemblyError::EmptyImage);
        }
        Ok(())
    }

    /// Build the document. `image` is the published product image and its
    /// MIME type, when the submission carried one.
    pub fn assemble(
        submission: &BrandSubmission,
        image: Option<(&Published, &str)>,
    ) -> Result<MetadataDocument, AssemblyError> {
        Self::validate(submission)?;

        let attributes = TraitName::ALL
            .iter()
            .map(|name| Attribute {
                trait_type: name.as_str().to_string(),
                value: match name {
                    TraitName::Category => submission.category.as_str().to_string(),
                    TraitName::Serial => submission.serial.trim().to_string(),
                },
            })
            .collect();

        let files = image
            .map(|(published, mime)| MetadataFile {
                mime_type: mime.to_string(),
                uri: published.uri.clone(),
            })
            .into_iter()
            .collect();

        let document = MetadataDocument {
            name: submission.name.trim().to_string(),
            description: submission.description.trim().to_string(),
            image_reference: image.map(|(published, _)| published.uri.clone()),
            attributes,
            properties: MetadataProperties { files },
        };
        document
            .validate()
            .map_err(|e| AssemblyError::InvalidDocument(e.to_string()))?;
        Ok(document)
    }
}

/// The product name cut to the on-ledger name limit, on a char boundary.
/// The metadata document keeps the full name.
pub fn onchain_name(name: &str) -> String {
    let name = name.trim();
    if name.len() <= MAX_NAME_LEN {
        return name.to_string();
    }
    let mut end = MAX_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}
