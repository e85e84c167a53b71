use std::collections::BTreeMap;

/// Authentication attached to a test case.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Auth {
    None,
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl Default for Auth {
    fn default() -> Self {
        Auth::None
    }
}

/// A single authored API test case.
///
/// `verify_response` holds the raw user-authored expected-body document; an
/// empty or absent value means body verification is not requested for this
/// case.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TestCase {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub method: String,

    pub url: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default)]
    pub auth: Auth,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_response: Option<String>,
}

impl TestCase {
    pub fn new(id: impl Into<String>, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            method: method.into(),
            url: url.into(),
            headers: BTreeMap::new(),
            params: BTreeMap::new(),
            body: None,
            auth: Auth::None,
            verify_response: None,
        }
    }

    /// Display name for reports: the authored name, or the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
