//! Page field sets and creation defaults.
//!
//! [`PageFields`] is the typed form of a "field name → value" map. Field
//! names are checked when the map is converted, so a misspelled default in
//! configuration fails when the manager is built instead of when a page is
//! created.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use trellis_store::{Page, PageId, SiteId};

use crate::error::PageError;

/// Optional value for every settable page field.
///
/// camelCase aliases (`routeName`, `templateCode`, `customUrl`) are
/// accepted on input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(alias = "customUrl", skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    #[serde(alias = "routeName", skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decorate: Option<bool>,
    #[serde(alias = "templateCode", skip_serializing_if = "Option::is_none")]
    pub template_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<PageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<SiteId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<HashMap<String, serde_json::Value>>,
}

impl PageFields {
    /// Convert a field-name map into typed fields.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidConfiguration`] naming the first unknown
    /// field or mistyped value.
    pub fn from_map(map: &BTreeMap<String, serde_json::Value>) -> Result<Self, PageError> {
        let object: serde_json::Map<String, serde_json::Value> = map
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| PageError::InvalidConfiguration(e.to_string()))
    }

    /// Fill every unset field from `defaults`. Values set on `self` win.
    #[must_use]
    pub fn merged_over(self, defaults: &PageFields) -> PageFields {
        PageFields {
            name: self.name.or_else(|| defaults.name.clone()),
            slug: self.slug.or_else(|| defaults.slug.clone()),
            url: self.url.or_else(|| defaults.url.clone()),
            custom_url: self.custom_url.or_else(|| defaults.custom_url.clone()),
            route_name: self.route_name.or_else(|| defaults.route_name.clone()),
            position: self.position.or(defaults.position),
            enabled: self.enabled.or(defaults.enabled),
            decorate: self.decorate.or(defaults.decorate),
            template_code: self
                .template_code
                .or_else(|| defaults.template_code.clone()),
            parent: self.parent.or(defaults.parent),
            site: self.site.or(defaults.site),
            settings: self.settings.or_else(|| defaults.settings.clone()),
        }
    }

    /// Set every present field on `page`.
    pub fn apply_to(self, page: &mut Page) {
        if let Some(name) = self.name {
            page.name = name;
        }
        if let Some(slug) = self.slug {
            page.slug = Some(slug);
        }
        if let Some(url) = self.url {
            page.url = Some(url);
        }
        if let Some(custom_url) = self.custom_url {
            page.custom_url = Some(custom_url);
        }
        if let Some(route_name) = self.route_name {
            page.route_name = route_name;
        }
        if let Some(position) = self.position {
            page.position = position;
        }
        if let Some(enabled) = self.enabled {
            page.enabled = enabled;
        }
        if let Some(decorate) = self.decorate {
            page.decorate = decorate;
        }
        if let Some(template_code) = self.template_code {
            page.template_code = Some(template_code);
        }
        if let Some(parent) = self.parent {
            page.parent = Some(parent);
        }
        if let Some(site) = self.site {
            page.site = Some(site);
        }
        if let Some(settings) = self.settings {
            page.settings = settings;
        }
    }
}

/// Default field sets used by [`PageManager::create`](crate::PageManager::create).
#[derive(Clone, Debug, Default)]
pub struct PageDefaults {
    global: PageFields,
    routes: HashMap<String, PageFields>,
}

impl PageDefaults {
    /// Create defaults with a global set and no route-specific sets.
    #[must_use]
    pub fn new(global: PageFields) -> Self {
        Self {
            global,
            routes: HashMap::new(),
        }
    }

    /// Register the default set for `route_name`.
    #[must_use]
    pub fn with_route(mut self, route_name: impl Into<String>, fields: PageFields) -> Self {
        self.routes.insert(route_name.into(), fields);
        self
    }

    /// Build defaults from untyped configuration maps.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidConfiguration`] if any set contains an
    /// unknown field or a mistyped value. The message names the set.
    pub fn from_config(
        global: &BTreeMap<String, serde_json::Value>,
        routes: &BTreeMap<String, BTreeMap<String, serde_json::Value>>,
    ) -> Result<Self, PageError> {
        let global = PageFields::from_map(global)
            .map_err(|e| PageError::InvalidConfiguration(format!("defaults: {}", reason(e))))?;

        let mut defaults = Self::new(global);
        for (route_name, fields) in routes {
            let fields = PageFields::from_map(fields).map_err(|e| {
                PageError::InvalidConfiguration(format!(
                    "route_defaults.{route_name}: {}",
                    reason(e)
                ))
            })?;
            defaults.routes.insert(route_name.clone(), fields);
        }

        Ok(defaults)
    }

    /// Global default set.
    #[must_use]
    pub fn global(&self) -> &PageFields {
        &self.global
    }

    /// Default set registered for `route_name`.
    #[must_use]
    pub fn for_route(&self, route_name: &str) -> Option<&PageFields> {
        self.routes.get(route_name)
    }

    /// Default set applying to a page created with `fields`.
    #[must_use]
    pub fn resolve(&self, fields: &PageFields) -> &PageFields {
        fields
            .route_name
            .as_deref()
            .and_then(|route_name| self.for_route(route_name))
            .unwrap_or(&self.global)
    }
}

fn reason(err: PageError) -> String {
    match err {
        PageError::InvalidConfiguration(message) => message,
        other => other.to_string(),
    }
}
