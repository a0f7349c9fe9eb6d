use std::collections::{HashMap, HashSet};

use flatmap_shared::scale::{self, LinearScale, SIZE_TO_RADIUS};
use flatmap_shared::{Flat, ScaleConfig};
use tracing::{debug, trace};

use crate::error::DrawError;
use crate::marker::{build_descriptor, path_data, MarkerDescriptor, Projector};
use crate::scene::{ElementId, PrimitiveKind, Scene};

/// Class every marker element carries.
pub const FLAT_CLASS: &str = "flat";
/// Styling hook class on every marker element.
pub const MARKER_CLASS: &str = "flat-marker";
/// Applied to the marker whose flat id matches the current selection.
pub const SELECTED_CLASS: &str = "flat-marker-selected";
/// Applied to the marker whose flat id matches the current hover preview.
pub const HOVERED_CLASS: &str = "flat-marker-hovered";
/// Container-level class, present iff some flat is selected.
pub const HAS_SELECTION_CLASS: &str = "flat-map-has-selection";

/// Optional host callbacks fired from pointer-event dispatch. All are
/// fire-and-forget; a panicking callback aborts only that dispatch.
#[derive(Clone, Copy, Default)]
pub struct Callbacks<'a> {
    pub on_mouse_over: Option<&'a dyn Fn(&Flat)>,
    pub on_mouse_out: Option<&'a dyn Fn(&Flat)>,
    pub on_click: Option<&'a dyn Fn(&Flat)>,
}

/// Pointer events the host forwards to the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Over,
    Out,
    Click,
}

/// What the host should do with the raw input event after dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub stop_propagation: bool,
    pub prevent_default: bool,
}

/// One live marker: its scene handle, the flat datum bound to it on the most
/// recent render, and the primitive kind the element was created with.
struct BoundMarker {
    element: ElementId,
    flat: Flat,
    kind: PrimitiveKind,
}

/// Keyed reconciliation of flats onto scene elements.
///
/// Owns the flat-id → element mapping for one scene. After every successful
/// [`draw`](MarkerLayer::draw) the mapping is a bijection onto the input ids:
/// no duplicate elements, no orphans.
pub struct MarkerLayer {
    config: ScaleConfig,
    size_scale: LinearScale,
    markers: HashMap<u64, BoundMarker>,
}

impl MarkerLayer {
    pub fn new(config: ScaleConfig) -> Self {
        Self::with_size_scale(config, SIZE_TO_RADIUS)
    }

    /// Override the default size-to-radius scale.
    pub fn with_size_scale(config: ScaleConfig, size_scale: LinearScale) -> Self {
        Self {
            config,
            size_scale,
            markers: HashMap::new(),
        }
    }

    /// Number of live marker elements.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Scene handle currently bound to a flat id, if present.
    pub fn element_for(&self, flat_id: u64) -> Option<ElementId> {
        self.markers.get(&flat_id).map(|m| m.element)
    }

    /// Render one frame: diff `flats` against the live element set and
    /// create, update, or remove elements so the two match exactly.
    ///
    /// Synchronous and idempotent — an identical second call changes no
    /// structure, only rewrites the same attribute values. On error the
    /// scene is left partially updated.
    pub fn draw<S: Scene, P: Projector>(
        &mut self,
        scene: &mut S,
        projector: &P,
        flats: &[Flat],
        selected_flat_id: Option<u64>,
        previewed_flat_id: Option<u64>,
    ) -> Result<(), DrawError> {
        scene.set_container_class(HAS_SELECTION_CLASS, selected_flat_id.is_some());

        let mut descriptors = Vec::with_capacity(flats.len());
        for flat in flats {
            descriptors.push(build_descriptor(flat, projector, &self.size_scale)?);
        }

        // Exit: drop elements whose id vanished from the input.
        let present: HashSet<u64> = descriptors.iter().map(|d| d.flat.id).collect();
        let before = self.markers.len();
        self.markers.retain(|id, marker| {
            if present.contains(id) {
                true
            } else {
                scene.remove(marker.element);
                false
            }
        });
        let removed = before - self.markers.len();

        let mut created = 0usize;
        let mut updated = 0usize;

        for descriptor in &descriptors {
            let kind = if descriptor.is_circle() {
                PrimitiveKind::Circle
            } else {
                PrimitiveKind::Path
            };

            let element = match self.markers.get_mut(&descriptor.flat.id) {
                Some(marker) if marker.kind == kind => {
                    // Update in place, rebinding the datum so event dispatch
                    // sees the latest flat.
                    marker.flat = descriptor.flat.clone();
                    updated += 1;
                    marker.element
                }
                Some(marker) => {
                    // Room count crossed the circle/path boundary; the
                    // primitive type cannot be mutated, so recreate.
                    trace!(
                        flat_id = descriptor.flat.id,
                        "marker primitive kind switched, recreating element"
                    );
                    scene.remove(marker.element);
                    let element = scene.create(kind);
                    marker.element = element;
                    marker.flat = descriptor.flat.clone();
                    marker.kind = kind;
                    updated += 1;
                    element
                }
                None => {
                    let element = scene.create(kind);
                    self.markers.insert(
                        descriptor.flat.id,
                        BoundMarker {
                            element,
                            flat: descriptor.flat.clone(),
                            kind,
                        },
                    );
                    created += 1;
                    element
                }
            };

            self.apply(scene, element, descriptor, selected_flat_id, previewed_flat_id);
        }

        debug!(created, updated, removed, "marker layer reconciled");
        Ok(())
    }

    /// Write a descriptor's attributes onto its element. Runs for created
    /// and updated elements alike, every render.
    fn apply<S: Scene>(
        &self,
        scene: &mut S,
        element: ElementId,
        descriptor: &MarkerDescriptor,
        selected_flat_id: Option<u64>,
        previewed_flat_id: Option<u64>,
    ) {
        if descriptor.is_circle() {
            scene.set_attr(element, "cx", Some(&descriptor.x.to_string()));
            scene.set_attr(element, "cy", Some(&descriptor.y.to_string()));
            scene.set_attr(element, "r", Some(&descriptor.radius.to_string()));
            scene.set_attr(element, "d", None);
        } else {
            scene.set_attr(element, "d", Some(&path_data(&descriptor.polygon)));
            scene.set_attr(element, "cx", None);
            scene.set_attr(element, "cy", None);
            scene.set_attr(element, "r", None);
        }

        // Recomputed at paint time rather than taken from the descriptor;
        // the two agree, but paint-time recomputation is the contract.
        let flat = &descriptor.flat;
        let fill = scale::price_color(flat.price / flat.size, self.config.price_per_area);
        scene.set_style(element, "fill", &fill);

        scene.set_class(element, FLAT_CLASS, true);
        scene.set_class(element, MARKER_CLASS, true);
        scene.set_class(element, SELECTED_CLASS, selected_flat_id == Some(flat.id));
        scene.set_class(element, HOVERED_CLASS, previewed_flat_id == Some(flat.id));
    }

    /// Dispatch a pointer event against the marker for `flat_id`.
    ///
    /// Hover classes are toggled on the element immediately, ahead of any
    /// host-driven re-render. The callback receives the flat bound on the
    /// most recent draw, never a stale capture. Events for unknown ids are
    /// ignored.
    pub fn pointer_event<S: Scene>(
        &self,
        scene: &mut S,
        flat_id: u64,
        event: PointerEvent,
        callbacks: &Callbacks<'_>,
    ) -> EventOutcome {
        let Some(marker) = self.markers.get(&flat_id) else {
            return EventOutcome::default();
        };

        match event {
            PointerEvent::Over => {
                if let Some(on_mouse_over) = callbacks.on_mouse_over {
                    on_mouse_over(&marker.flat);
                }
                scene.set_class(marker.element, HOVERED_CLASS, true);
                EventOutcome::default()
            }
            PointerEvent::Out => {
                if let Some(on_mouse_out) = callbacks.on_mouse_out {
                    on_mouse_out(&marker.flat);
                }
                scene.set_class(marker.element, HOVERED_CLASS, false);
                EventOutcome::default()
            }
            PointerEvent::Click => {
                if let Some(on_click) = callbacks.on_click {
                    on_click(&marker.flat);
                }
                // Keep the click from reaching a map-level click-to-deselect
                // handler.
                EventOutcome {
                    stop_propagation: true,
                    prevent_default: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::SvgScene;
    use flatmap_shared::{Domain, Point};
    use std::cell::RefCell;

    fn config() -> ScaleConfig {
        ScaleConfig {
            price_per_area: Domain {
                min: 1000.0,
                max: 5000.0,
            },
        }
    }

    fn projector() -> impl Projector {
        |lat: f64, lng: f64| Point {
            x: lng * 10.0,
            y: lat * -10.0,
        }
    }

    fn flat(id: u64, rooms: u32) -> Flat {
        Flat {
            id,
            latitude: 52.5,
            longitude: 13.4,
            size: 50.0,
            rooms,
            price: 100_000.0,
        }
    }

    fn scene() -> SvgScene {
        SvgScene::new(800.0, 600.0)
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        layer.draw(&mut scene, &projector(), &[], None, None).unwrap();
        assert!(layer.is_empty());
        assert_eq!(scene.element_count(), 0);
    }

    #[test]
    fn test_bijection_after_draw() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        let flats = vec![flat(1, 1), flat(2, 3), flat(3, 4)];
        layer.draw(&mut scene, &projector(), &flats, None, None).unwrap();
        assert_eq!(layer.len(), 3);
        assert_eq!(scene.element_count(), 3);
        for f in &flats {
            assert!(layer.element_for(f.id).is_some());
        }
    }

    #[test]
    fn test_removed_flat_removes_element() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        layer
            .draw(&mut scene, &projector(), &[flat(1, 2), flat(2, 2)], None, None)
            .unwrap();
        layer
            .draw(&mut scene, &projector(), &[flat(2, 2)], None, None)
            .unwrap();
        assert_eq!(layer.len(), 1);
        assert_eq!(scene.element_count(), 1);
        assert!(layer.element_for(1).is_none());
        assert!(layer.element_for(2).is_some());
    }

    #[test]
    fn test_identity_stable_across_identical_draws() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        let flats = vec![flat(1, 2), flat(2, 2)];
        layer.draw(&mut scene, &projector(), &flats, None, None).unwrap();
        let first = layer.element_for(1).unwrap();
        let second = layer.element_for(2).unwrap();
        layer.draw(&mut scene, &projector(), &flats, None, None).unwrap();
        assert_eq!(layer.element_for(1), Some(first));
        assert_eq!(layer.element_for(2), Some(second));
        assert_eq!(scene.element_count(), 2);
    }

    #[test]
    fn test_single_room_renders_circle_attrs() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        layer
            .draw(&mut scene, &projector(), &[flat(1, 1)], None, None)
            .unwrap();
        let el = layer.element_for(1).unwrap();
        assert!(scene.attr(el, "cx").is_some());
        assert!(scene.attr(el, "cy").is_some());
        assert!(scene.attr(el, "r").is_some());
        assert!(scene.attr(el, "d").is_none());
    }

    #[test]
    fn test_multi_room_renders_path_attr() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        layer
            .draw(&mut scene, &projector(), &[flat(1, 3)], None, None)
            .unwrap();
        let el = layer.element_for(1).unwrap();
        assert!(scene.attr(el, "d").is_some());
        assert!(scene.attr(el, "cx").is_none());
        assert!(scene.attr(el, "r").is_none());
    }

    #[test]
    fn test_room_change_switches_primitive() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        layer
            .draw(&mut scene, &projector(), &[flat(1, 1)], None, None)
            .unwrap();
        layer
            .draw(&mut scene, &projector(), &[flat(1, 2)], None, None)
            .unwrap();
        // Exactly one element for the id, now a path.
        assert_eq!(scene.element_count(), 1);
        let el = layer.element_for(1).unwrap();
        assert_eq!(scene.kind(el), Some(PrimitiveKind::Path));
        assert!(scene.attr(el, "d").is_some());
        assert!(scene.attr(el, "cx").is_none());
    }

    #[test]
    fn test_circle_radius_matches_size_scale() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        layer
            .draw(&mut scene, &projector(), &[flat(1, 1)], None, None)
            .unwrap();
        let el = layer.element_for(1).unwrap();
        let r: f64 = scene.attr(el, "r").unwrap().parse().unwrap();
        assert!((r - 26.315789473684209).abs() < 1e-9);
    }

    #[test]
    fn test_fill_recomputed_from_price_per_area() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        layer
            .draw(&mut scene, &projector(), &[flat(1, 2)], None, None)
            .unwrap();
        let el = layer.element_for(1).unwrap();
        // 100000 / 50 = 2000 in [5000, 1000]
        assert_eq!(scene.style(el, "fill").as_deref(), Some("#86cb67"));
    }

    #[test]
    fn test_selection_and_hover_classes() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        let flats = vec![flat(1, 2), flat(2, 2), flat(3, 2)];
        layer
            .draw(&mut scene, &projector(), &flats, Some(2), Some(3))
            .unwrap();

        let selected: Vec<u64> = flats
            .iter()
            .map(|f| f.id)
            .filter(|id| scene.has_class(layer.element_for(*id).unwrap(), SELECTED_CLASS))
            .collect();
        let hovered: Vec<u64> = flats
            .iter()
            .map(|f| f.id)
            .filter(|id| scene.has_class(layer.element_for(*id).unwrap(), HOVERED_CLASS))
            .collect();
        assert_eq!(selected, vec![2]);
        assert_eq!(hovered, vec![3]);
        assert!(scene.container_has_class(HAS_SELECTION_CLASS));
    }

    #[test]
    fn test_selection_classes_clear_on_next_draw() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        let flats = vec![flat(1, 2)];
        layer
            .draw(&mut scene, &projector(), &flats, Some(1), Some(1))
            .unwrap();
        layer.draw(&mut scene, &projector(), &flats, None, None).unwrap();
        let el = layer.element_for(1).unwrap();
        assert!(!scene.has_class(el, SELECTED_CLASS));
        assert!(!scene.has_class(el, HOVERED_CLASS));
        assert!(!scene.container_has_class(HAS_SELECTION_CLASS));
    }

    #[test]
    fn test_base_classes_always_present() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        layer
            .draw(&mut scene, &projector(), &[flat(1, 2)], None, None)
            .unwrap();
        let el = layer.element_for(1).unwrap();
        assert!(scene.has_class(el, FLAT_CLASS));
        assert!(scene.has_class(el, MARKER_CLASS));
    }

    #[test]
    fn test_projection_failure_aborts_draw() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        let broken = |_lat: f64, _lng: f64| Point {
            x: f64::INFINITY,
            y: 0.0,
        };
        let err = layer
            .draw(&mut scene, &broken, &[flat(1, 2)], None, None)
            .unwrap_err();
        assert_eq!(err, DrawError::NonFiniteProjection { id: 1 });
        assert!(layer.is_empty());
    }

    #[test]
    fn test_pointer_over_out_toggles_hover_class() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        layer
            .draw(&mut scene, &projector(), &[flat(1, 2)], None, None)
            .unwrap();
        let el = layer.element_for(1).unwrap();

        layer.pointer_event(&mut scene, 1, PointerEvent::Over, &Callbacks::default());
        assert!(scene.has_class(el, HOVERED_CLASS));
        layer.pointer_event(&mut scene, 1, PointerEvent::Out, &Callbacks::default());
        assert!(!scene.has_class(el, HOVERED_CLASS));
    }

    #[test]
    fn test_pointer_callbacks_receive_flat() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        layer
            .draw(&mut scene, &projector(), &[flat(7, 2)], None, None)
            .unwrap();

        let seen = RefCell::new(Vec::new());
        let on_over = |f: &Flat| seen.borrow_mut().push(f.id);
        let callbacks = Callbacks {
            on_mouse_over: Some(&on_over),
            ..Default::default()
        };
        layer.pointer_event(&mut scene, 7, PointerEvent::Over, &callbacks);
        assert_eq!(seen.into_inner(), vec![7]);
    }

    #[test]
    fn test_click_stops_propagation() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        layer
            .draw(&mut scene, &projector(), &[flat(1, 2)], None, None)
            .unwrap();
        let outcome =
            layer.pointer_event(&mut scene, 1, PointerEvent::Click, &Callbacks::default());
        assert!(outcome.stop_propagation);
        assert!(outcome.prevent_default);
    }

    #[test]
    fn test_pointer_event_for_unknown_id_is_ignored() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        let outcome =
            layer.pointer_event(&mut scene, 99, PointerEvent::Click, &Callbacks::default());
        assert_eq!(outcome, EventOutcome::default());
    }

    #[test]
    fn test_dispatch_sees_latest_flat_after_update() {
        let mut layer = MarkerLayer::new(config());
        let mut scene = scene();
        layer
            .draw(&mut scene, &projector(), &[flat(1, 2)], None, None)
            .unwrap();

        // Same id, new price: the rebinding on update must be visible to
        // the next dispatch.
        let mut changed = flat(1, 2);
        changed.price = 250_000.0;
        layer
            .draw(&mut scene, &projector(), &[changed], None, None)
            .unwrap();

        let seen_price = RefCell::new(0.0f64);
        let on_click = |f: &Flat| *seen_price.borrow_mut() = f.price;
        let callbacks = Callbacks {
            on_click: Some(&on_click),
            ..Default::default()
        };
        layer.pointer_event(&mut scene, 1, PointerEvent::Click, &callbacks);
        assert!((seen_price.into_inner() - 250_000.0).abs() < 1e-9);
    }
}
