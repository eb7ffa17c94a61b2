//! Opaque embedded content.
//!
//! An entity wraps a live DOM node the editor does not interpret. The model
//! keeps a handle to the wrapper; rendering moves that same node into place.
//! Entity identity is encoded in the wrapper's class list:
//! `_Entity _EType_<type> _EId_<id> _EReadonly_1`.

use serde::{Deserialize, Serialize};
use tapestry_dom::{Dom, NodeId};

use super::format::Format;

pub const ENTITY_CLASS: &str = "_Entity";
const ENTITY_TYPE_PREFIX: &str = "_EType_";
const ENTITY_ID_PREFIX: &str = "_EId_";
const ENTITY_READONLY_PREFIX: &str = "_EReadonly_";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub is_readonly: bool,
    /// Created for content the editor could not model (e.g. unknown tables)
    /// rather than by an entity-aware feature.
    #[serde(default)]
    pub is_fake_entity: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModelEntity {
    pub wrapper: NodeId,
    pub entity_format: EntityInfo,
    pub format: Format,
    #[serde(default)]
    pub is_selected: bool,
}

pub fn is_entity_element(dom: &Dom, node: NodeId) -> bool {
    dom.has_class(node, ENTITY_CLASS)
}

/// Read entity identity from a wrapper's class list.
pub fn parse_entity_info(dom: &Dom, wrapper: NodeId) -> EntityInfo {
    let mut info = EntityInfo::default();
    for class in dom.class_list(wrapper) {
        if let Some(t) = class.strip_prefix(ENTITY_TYPE_PREFIX) {
            info.entity_type = Some(t.to_string());
        } else if let Some(id) = class.strip_prefix(ENTITY_ID_PREFIX) {
            info.id = Some(id.to_string());
        } else if let Some(flag) = class.strip_prefix(ENTITY_READONLY_PREFIX) {
            info.is_readonly = flag == "1";
        }
    }
    info
}

/// Write entity identity into a wrapper's class list.
pub fn apply_entity_info(dom: &mut Dom, wrapper: NodeId, info: &EntityInfo) {
    if info.is_fake_entity {
        return;
    }
    let mut classes = vec![ENTITY_CLASS.to_string()];
    if let Some(t) = &info.entity_type {
        classes.push(format!("{ENTITY_TYPE_PREFIX}{t}"));
    }
    if let Some(id) = &info.id {
        classes.push(format!("{ENTITY_ID_PREFIX}{id}"));
    }
    classes.push(format!(
        "{ENTITY_READONLY_PREFIX}{}",
        if info.is_readonly { 1 } else { 0 }
    ));
    dom.set_attribute(wrapper, "class", classes.join(" "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_info_round_trip() {
        let mut dom = Dom::new();
        let wrapper = dom.create_element("div");
        let info = EntityInfo {
            id: Some("e1".into()),
            entity_type: Some("mention".into()),
            is_readonly: true,
            is_fake_entity: false,
        };
        apply_entity_info(&mut dom, wrapper, &info);

        assert!(is_entity_element(&dom, wrapper));
        assert_eq!(parse_entity_info(&dom, wrapper), info);
        assert_eq!(
            dom.attribute(wrapper, "class"),
            Some("_Entity _EType_mention _EId_e1 _EReadonly_1")
        );
    }
}
