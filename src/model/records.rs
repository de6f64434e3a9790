use serde::{Deserialize, Serialize};

/// A user-defined (loadable) family with its type variants in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFamilyRecord {
    pub category: String,
    pub family_name: String,
    #[serde(default)]
    pub type_names: Vec<String>,
}

impl UserFamilyRecord {
    #[must_use]
    pub fn new<I, S>(category: &str, family_name: &str, type_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category: category.to_string(),
            family_name: family_name.to_string(),
            type_names: type_names.into_iter().map(Into::into).collect(),
        }
    }
}

/// A system family type. The family name doubles as its category key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemFamilyTypeRecord {
    pub category_key: String,
    pub type_name: String,
}

impl SystemFamilyTypeRecord {
    #[must_use]
    pub fn new(category_key: &str, type_name: &str) -> Self {
        Self {
            category_key: category_key.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

/// Both record lists as supplied by a data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyInventory {
    pub user_families: Vec<UserFamilyRecord>,
    pub system_types: Vec<SystemFamilyTypeRecord>,
}

impl FamilyInventory {
    #[must_use]
    pub fn total_user_types(&self) -> usize {
        self.user_families.iter().map(|f| f.type_names.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_families.is_empty() && self.system_types.is_empty()
    }
}
