//! Container abstraction over the host's retained drawing surface.
//!
//! A DOM subtree, an SVG document, or any other scene graph can back this;
//! the reconciliation layer only needs the capability set below.

/// Opaque handle to one element inside a [`Scene`]. Stable for the lifetime
/// of the element; whether handles are reused is up to the implementation,
/// since the layer never touches a handle after removing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// The two marker primitives. An element's kind is fixed at creation;
/// switching kinds means destroy-and-recreate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Circle,
    Path,
}

/// Host-provided element container.
pub trait Scene {
    /// Append a new element of the given kind and return its handle.
    fn create(&mut self, kind: PrimitiveKind) -> ElementId;

    /// Destroy an element. Its handle must not be used afterwards.
    fn remove(&mut self, id: ElementId);

    /// Set or clear (`None`) an attribute on an element.
    fn set_attr(&mut self, id: ElementId, name: &str, value: Option<&str>);

    /// Set an inline style property on an element.
    fn set_style(&mut self, id: ElementId, name: &str, value: &str);

    /// Add or remove a state class on an element.
    fn set_class(&mut self, id: ElementId, class: &str, on: bool);

    /// Add or remove a state class on the container itself.
    fn set_container_class(&mut self, class: &str, on: bool);
}
