//! In-memory retained scene that serializes to an SVG document.
//!
//! Backs the reconciliation tests and the snapshot host; a browser host
//! would implement [`Scene`] over a live DOM subtree instead.

use std::collections::{BTreeMap, BTreeSet};

use crate::scene::{ElementId, PrimitiveKind, Scene};

#[derive(Debug, Clone)]
struct SvgElement {
    id: ElementId,
    kind: PrimitiveKind,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    classes: BTreeSet<String>,
}

impl SvgElement {
    fn tag(&self) -> &'static str {
        match self.kind {
            PrimitiveKind::Circle => "circle",
            PrimitiveKind::Path => "path",
        }
    }
}

/// Ordered element container with per-element attributes, inline styles and
/// classes, plus a container-level class set.
#[derive(Debug, Clone, Default)]
pub struct SvgScene {
    width: f64,
    height: f64,
    next_id: u64,
    elements: Vec<SvgElement>,
    container_classes: BTreeSet<String>,
}

impl SvgScene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Element handles in document order.
    pub fn element_ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|e| e.id).collect()
    }

    pub fn kind(&self, id: ElementId) -> Option<PrimitiveKind> {
        self.find(id).map(|e| e.kind)
    }

    pub fn attr(&self, id: ElementId, name: &str) -> Option<String> {
        self.find(id).and_then(|e| e.attrs.get(name).cloned())
    }

    pub fn style(&self, id: ElementId, name: &str) -> Option<String> {
        self.find(id).and_then(|e| e.styles.get(name).cloned())
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.find(id).is_some_and(|e| e.classes.contains(class))
    }

    pub fn container_has_class(&self, class: &str) -> bool {
        self.container_classes.contains(class)
    }

    fn find(&self, id: ElementId) -> Option<&SvgElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn find_mut(&mut self, id: ElementId) -> Option<&mut SvgElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Serialize the scene as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}""#,
            self.width, self.height
        ));
        if !self.container_classes.is_empty() {
            out.push_str(&format!(r#" class="{}""#, join(&self.container_classes)));
        }
        out.push('>');

        for element in &self.elements {
            out.push('<');
            out.push_str(element.tag());
            for (name, value) in &element.attrs {
                out.push_str(&format!(r#" {name}="{value}""#));
            }
            if !element.classes.is_empty() {
                out.push_str(&format!(r#" class="{}""#, join(&element.classes)));
            }
            if !element.styles.is_empty() {
                let style: Vec<String> = element
                    .styles
                    .iter()
                    .map(|(name, value)| format!("{name}:{value}"))
                    .collect();
                out.push_str(&format!(r#" style="{}""#, style.join(";")));
            }
            out.push_str("/>");
        }

        out.push_str("</svg>");
        out
    }
}

fn join(classes: &BTreeSet<String>) -> String {
    classes.iter().cloned().collect::<Vec<_>>().join(" ")
}

impl Scene for SvgScene {
    fn create(&mut self, kind: PrimitiveKind) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.push(SvgElement {
            id,
            kind,
            attrs: BTreeMap::new(),
            styles: BTreeMap::new(),
            classes: BTreeSet::new(),
        });
        id
    }

    fn remove(&mut self, id: ElementId) {
        self.elements.retain(|e| e.id != id);
    }

    fn set_attr(&mut self, id: ElementId, name: &str, value: Option<&str>) {
        if let Some(element) = self.find_mut(id) {
            match value {
                Some(value) => {
                    element.attrs.insert(name.to_string(), value.to_string());
                }
                None => {
                    element.attrs.remove(name);
                }
            }
        }
    }

    fn set_style(&mut self, id: ElementId, name: &str, value: &str) {
        if let Some(element) = self.find_mut(id) {
            element.styles.insert(name.to_string(), value.to_string());
        }
    }

    fn set_class(&mut self, id: ElementId, class: &str, on: bool) {
        if let Some(element) = self.find_mut(id) {
            if on {
                element.classes.insert(class.to_string());
            } else {
                element.classes.remove(class);
            }
        }
    }

    fn set_container_class(&mut self, class: &str, on: bool) {
        if on {
            self.container_classes.insert(class.to_string());
        } else {
            self.container_classes.remove(class);
        }
    }
}
