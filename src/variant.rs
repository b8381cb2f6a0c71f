use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    config::Geometry,
    error::{ConfigError, GeneratorError, Result},
};

/// A named output flavor: where the JPEGs go, how the run is announced and
/// which composite layout is used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Name used on the command line
    pub name: String,

    /// Folder created under the output root
    pub output_folder: String,

    /// Plural noun used in the success message ("SEO images")
    pub label: String,

    /// Composite layout
    #[serde(default)]
    pub geometry: Geometry,
}

impl Variant {
    pub fn new<N, F, L>(name: N, output_folder: F, label: L) -> Self
    where
        N: Into<String>,
        F: Into<String>,
        L: Into<String>,
    {
        Self {
            name: name.into(),
            output_folder: output_folder.into(),
            label: label.into(),
            geometry: Geometry::default(),
        }
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Square social-sharing assets
    pub fn seo() -> Self {
        Self::new("seo", "seo", "SEO images")
    }

    /// Banner assets. Shares the square layout until a wide background exists.
    pub fn banner() -> Self {
        Self::new("banner", "banner", "banner images")
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "variants.name".to_string(),
                value: format!("{:?}", self.name)
            }.into());
        }

        // The folder is joined onto the output root, so it must stay a single component
        let folder = std::path::Path::new(&self.output_folder);
        let single_component = folder.components().count() == 1
            && matches!(folder.components().next(), Some(std::path::Component::Normal(_)));
        if !single_component {
            return Err(ConfigError::InvalidValue {
                key: format!("variants.{}.output_folder", self.name),
                value: self.output_folder.clone()
            }.into());
        }

        self.geometry.validate()
    }
}

/// Registry of available variants
///
/// Built-in variants are always present; variants from the configuration file
/// are registered on top and may replace a built-in of the same name.
pub struct VariantRegistry {
    variants: BTreeMap<String, Variant>,
}

impl VariantRegistry {
    /// Create a new registry with all built-in variants
    pub fn new() -> Self {
        let mut registry = Self {
            variants: BTreeMap::new(),
        };

        registry.register_builtin_variants();
        registry
    }

    fn register_builtin_variants(&mut self) {
        self.register(Variant::seo());
        self.register(Variant::banner());
    }

    /// Register a variant, replacing any existing one with the same name
    pub fn register(&mut self, variant: Variant) {
        self.variants.insert(variant.name.clone(), variant);
    }

    /// Look up a variant by name
    pub fn get(&self, name: &str) -> Result<Variant> {
        self.variants
            .get(name)
            .cloned()
            .ok_or_else(|| GeneratorError::UnknownVariant {
                name: name.to_string(),
                available: self.available_variants(),
            })
    }

    /// All registered variant names, sorted
    pub fn available_variants(&self) -> Vec<String> {
        self.variants.keys().cloned().collect()
    }

    pub fn has_variant(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl Default for VariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_variants_available() {
        let registry = VariantRegistry::new();

        assert!(registry.has_variant("seo"));
        assert!(registry.has_variant("banner"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.available_variants(), vec!["banner", "seo"]);
    }

    #[test]
    fn test_builtins_share_geometry() {
        let registry = VariantRegistry::new();
        let seo = registry.get("seo").unwrap();
        let banner = registry.get("banner").unwrap();

        assert_eq!(seo.geometry, banner.geometry);
        assert_ne!(seo.output_folder, banner.output_folder);
        assert_eq!(seo.label, "SEO images");
    }

    #[test]
    fn test_unknown_variant() {
        let registry = VariantRegistry::new();
        match registry.get("poster") {
            Err(GeneratorError::UnknownVariant { name, available }) => {
                assert_eq!(name, "poster");
                assert_eq!(available, vec!["banner", "seo"]);
            }
            other => panic!("expected UnknownVariant, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_variant_registration() {
        let mut registry = VariantRegistry::new();
        let wide = Geometry {
            canvas: (512, 256),
            foreground: (128, 128),
            offset: (192, 64),
        };
        registry.register(Variant::new("og", "og", "Open Graph images").with_geometry(wide));

        assert!(registry.has_variant("og"));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("og").unwrap().geometry.canvas, (512, 256));
    }

    #[test]
    fn test_invalid_output_folder() {
        assert!(Variant::new("x", "../escape", "x").validate().is_err());
        assert!(Variant::new("x", "", "x").validate().is_err());
        assert!(Variant::new("", "x", "x").validate().is_err());
        assert!(Variant::seo().validate().is_ok());
    }
}
