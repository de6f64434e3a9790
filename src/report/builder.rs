use crate::config::{ReportConfig, ReportLabels};
use crate::model::{CategoryGroup, ReportDocument, ReportNode, SystemFamilyTypeRecord, UserFamilyRecord};

/// Groups user families by category in first-seen order.
#[must_use]
pub fn group_user_families(records: &[UserFamilyRecord]) -> CategoryGroup<&UserFamilyRecord> {
    CategoryGroup::from_records(records, |r| r.category.as_str())
}

/// Groups system family types by their family-name key in first-seen order.
#[must_use]
pub fn group_system_types(records: &[SystemFamilyTypeRecord]) -> CategoryGroup<&SystemFamilyTypeRecord> {
    CategoryGroup::from_records(records, |r| r.category_key.as_str())
}

/// Builds the report tree from both record lists.
///
/// The root holds two sections, user families first:
///
/// - user families: category → family → type
/// - system families: family-name key → type
///
/// Categories appear in the order they are first seen in each list and every
/// record lands in exactly one place. The same inputs always produce an equal
/// document.
///
/// # Example
///
/// ```
/// use family_report::config::ReportConfig;
/// use family_report::model::UserFamilyRecord;
/// use family_report::report::build_report;
///
/// let users = vec![UserFamilyRecord::new("Doors", "Door-A", ["36in"])];
/// let doc = build_report(&users, &[], &ReportConfig::default());
/// assert_eq!(doc.rows().len(), 1);
/// ```
#[must_use]
pub fn build_report(
    user_records: &[UserFamilyRecord],
    system_records: &[SystemFamilyTypeRecord],
    config: &ReportConfig,
) -> ReportDocument {
    let labels = &config.labels;

    let user_section = render_user_families(&group_user_families(user_records), labels);
    let system_section = render_system_types(&group_system_types(system_records), labels);

    let root = ReportNode::structural(&labels.root)
        .with_child(user_section)
        .with_child(system_section);

    ReportDocument {
        comment: config.comment.clone(),
        root,
    }
}

fn render_user_families(group: &CategoryGroup<&UserFamilyRecord>, labels: &ReportLabels) -> ReportNode {
    let mut section = ReportNode::structural(&labels.user_families);

    for (category, families) in group.iter() {
        let mut category_node = ReportNode::named(&labels.category, category);
        for family in families {
            let mut family_node = ReportNode::named(&labels.family, &family.family_name);
            family_node.children = family
                .type_names
                .iter()
                .map(|name| ReportNode::named(&labels.family_type, name))
                .collect();
            category_node.children.push(family_node);
        }
        tracing::debug!(category, families = families.len(), "rendered user category");
        section.children.push(category_node);
    }

    section
}

fn render_system_types(group: &CategoryGroup<&SystemFamilyTypeRecord>, labels: &ReportLabels) -> ReportNode {
    let mut section = ReportNode::structural(&labels.system_families);

    for (key, types) in group.iter() {
        let mut key_node = ReportNode::named(&labels.system_category, key);
        key_node.children = types
            .iter()
            .map(|t| ReportNode::named(&labels.system_type, &t.type_name))
            .collect();
        tracing::debug!(family = key, types = types.len(), "rendered system family");
        section.children.push(key_node);
    }

    section
}
