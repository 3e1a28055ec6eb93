//! Edge case tests for container variants, extensions and registry upkeep

use std::sync::{Arc, Mutex};
use trellis_ui::{ContainerKind, HierarchyIssue, NodeId, Size, Ui, UiConfig, UiError};

fn with_root_layout(kind: ContainerKind) -> (Ui, NodeId) {
    let mut ui = Ui::new();
    let layout = ui.create_container(kind);
    ui.set_content(NodeId::ROOT, Some(layout)).unwrap();
    (ui, layout)
}

// ============================================================================
// ORDERED LAYOUTS
// ============================================================================

#[test]
fn test_index_out_of_bounds_leaves_tree_unchanged() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let label = ui.create_component("Label");

    let err = ui.add_component_at(layout, label, 1).unwrap_err();
    assert_eq!(err, UiError::IndexOutOfBounds { container: layout, index: 1, len: 0 });
    assert!(err.is_rejection());
    assert_eq!(ui.parent(label), None);

    ui.add_component_at(layout, label, 0).unwrap();
    assert_eq!(ui.component_at(layout, 0), Some(label));
}

#[test]
fn test_replace_swaps_children_of_same_layout() {
    let (mut ui, layout) = with_root_layout(ContainerKind::HorizontalLayout);
    let a = ui.create_component("Label");
    let b = ui.create_component("Label");
    let c = ui.create_component("Label");
    for child in [a, b, c] {
        ui.add_component(layout, child).unwrap();
    }
    let detached = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&detached);
    ui.add_component_detach_listener(layout, move |_| *sink.lock().unwrap() += 1);

    ui.replace_component(layout, a, c).unwrap();

    assert_eq!(ui.components(layout), vec![c, b, a]);
    assert_eq!(*detached.lock().unwrap(), 0);
}

#[test]
fn test_replace_with_outsider_keeps_position() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let a = ui.create_component("Label");
    let b = ui.create_component("Label");
    let fresh = ui.create_component("Button");
    ui.add_component(layout, a).unwrap();
    ui.add_component(layout, b).unwrap();

    ui.replace_component(layout, a, fresh).unwrap();

    assert_eq!(ui.components(layout), vec![fresh, b]);
    assert_eq!(ui.parent(a), None);
    assert!(!ui.is_attached(a));
}

#[test]
fn test_move_components_between_layouts() {
    let (mut ui, target) = with_root_layout(ContainerKind::VerticalLayout);
    let source = ui.create_container(ContainerKind::CssLayout);
    let a = ui.create_component("Label");
    let b = ui.create_component("Label");
    ui.add_component(source, a).unwrap();
    ui.add_component(source, b).unwrap();

    ui.move_components_from(target, source).unwrap();

    assert_eq!(ui.components(target), vec![a, b]);
    assert_eq!(ui.component_count(source), 0);
    assert!(ui.is_attached(a) && ui.is_attached(b));
}

#[test]
fn test_remove_all_components() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let children: Vec<_> = (0..3).map(|_| ui.create_component("Label")).collect();
    for &child in &children {
        ui.add_component(layout, child).unwrap();
    }

    ui.remove_all_components(layout).unwrap();

    assert_eq!(ui.component_count(layout), 0);
    assert!(children.iter().all(|&c| ui.parent(c).is_none()));
    assert_eq!(ui.registry().len(), 2);
}

// ============================================================================
// SINGLE, SPLIT AND KEYED CONTAINERS
// ============================================================================

#[test]
fn test_single_container_content_replacement() {
    let (mut ui, panel) = with_root_layout(ContainerKind::Panel);
    let first = ui.create_component("Label");
    let second = ui.create_component("Label");

    ui.set_content(panel, Some(first)).unwrap();
    ui.set_content(panel, Some(second)).unwrap();

    assert_eq!(ui.content(panel), Some(second));
    assert_eq!(ui.parent(first), None);
    assert!(matches!(
        ui.add_component(panel, first),
        Err(UiError::UnsupportedStructure { .. })
    ));
}

#[test]
fn test_custom_component_rejects_generic_add() {
    let mut ui = Ui::new();
    let custom = ui.create_container(ContainerKind::CustomComponent);
    let root = ui.create_container(ContainerKind::VerticalLayout);
    let stray = ui.create_component("Label");

    ui.set_content(custom, Some(root)).unwrap();
    let err = ui.add_component(custom, stray).unwrap_err();

    assert!(err.is_rejection());
    assert_eq!(ui.components(custom), vec![root]);
}

#[test]
fn test_split_panel_slots() {
    let (mut ui, split) = with_root_layout(ContainerKind::HorizontalSplitPanel);
    let a = ui.create_component("Label");
    let b = ui.create_component("Label");
    let c = ui.create_component("Label");

    ui.add_component(split, a).unwrap();
    ui.add_component(split, b).unwrap();
    assert_eq!(ui.first_component(split), Some(a));
    assert_eq!(ui.second_component(split), Some(b));

    let err = ui.add_component(split, c).unwrap_err();
    assert!(matches!(err, UiError::UnsupportedStructure { .. }));
    assert_eq!(ui.parent(c), None);

    ui.set_first_component(split, Some(c)).unwrap();
    assert_eq!(ui.first_component(split), Some(c));
    assert_eq!(ui.parent(a), None);
    assert!(!ui.is_attached(a));
}

#[test]
fn test_split_panel_same_component_is_noop() {
    let (mut ui, split) = with_root_layout(ContainerKind::VerticalSplitPanel);
    let a = ui.create_component("Label");
    ui.set_second_component(split, Some(a)).unwrap();
    ui.mark_all_clean();

    let events = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&events);
    ui.add_component_attach_listener(split, move |_| *sink.lock().unwrap() += 1);
    ui.set_second_component(split, Some(a)).unwrap();

    assert_eq!(*events.lock().unwrap(), 0);
    assert!(!ui.has_dirty_connectors());
    assert_eq!(ui.components(split), vec![a]);
}

#[test]
fn test_split_panel_empty_first_slot_filled_first() {
    let (mut ui, split) = with_root_layout(ContainerKind::HorizontalSplitPanel);
    let a = ui.create_component("Label");
    let b = ui.create_component("Label");
    ui.set_second_component(split, Some(a)).unwrap();

    ui.add_component(split, b).unwrap();

    assert_eq!(ui.first_component(split), Some(b));
    assert_eq!(ui.components(split), vec![b, a]);
}

#[test]
fn test_keyed_layout_evicts_previous_occupant() {
    let (mut ui, layout) = with_root_layout(ContainerKind::CustomLayout);
    let a = ui.create_component("Label");
    let b = ui.create_component("Label");
    let c = ui.create_component("Label");

    ui.add_component_at_location(layout, a, "header").unwrap();
    ui.add_component_at_location(layout, b, "header").unwrap();
    ui.add_component(layout, c).unwrap();

    assert_eq!(ui.component_at_location(layout, "header"), Some(b));
    assert_eq!(ui.location_of(layout, c), Some(""));
    assert_eq!(ui.parent(a), None);
    assert_eq!(ui.component_count(layout), 2);

    ui.add_component_at_location(layout, c, "footer").unwrap();
    assert_eq!(ui.component_at_location(layout, ""), None);
    assert_eq!(ui.location_of(layout, c), Some("footer"));
}

#[test]
fn test_keyed_replace_uses_old_location() {
    let (mut ui, layout) = with_root_layout(ContainerKind::CustomLayout);
    let old = ui.create_component("Label");
    let new = ui.create_component("Label");
    ui.add_component_at_location(layout, old, "body").unwrap();

    ui.replace_component(layout, old, new).unwrap();

    assert_eq!(ui.component_at_location(layout, "body"), Some(new));
    assert_eq!(ui.parent(old), None);
}

// ============================================================================
// WINDOWS
// ============================================================================

#[test]
fn test_windows_are_root_children() {
    let mut ui = Ui::new();
    let window = ui.create_container(ContainerKind::Window);
    let label = ui.create_component("Label");

    assert!(ui.add_window(label).unwrap_err().is_rejection());
    ui.add_window(window).unwrap();

    assert_eq!(ui.windows(), vec![window]);
    assert!(ui.is_attached(window));
    assert_eq!(ui.components(NodeId::ROOT), vec![window]);

    assert!(ui.remove_window(window).unwrap());
    assert!(!ui.remove_window(window).unwrap());
    assert!(!ui.is_attached(window));
}

// ============================================================================
// EXTENSIONS
// ============================================================================

#[test]
fn test_extension_lifecycle() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let label = ui.create_component("Label");
    let tooltip = ui.create_extension("Tooltip");
    ui.add_extension(label, tooltip).unwrap();
    assert!(!ui.is_attached(tooltip));

    ui.add_component(layout, label).unwrap();
    assert!(ui.is_attached(tooltip));
    assert!(ui.is_dirty(tooltip));
    let id = ui.connector_id(tooltip).unwrap().clone();
    assert_eq!(ui.connector(id.as_str()), Some(tooltip));
    assert_eq!(ui.extensions(label), vec![tooltip]);
    assert!(ui.components(label).is_empty());

    assert!(ui.remove_extension(label, tooltip).unwrap());
    assert!(!ui.is_attached(tooltip));
    assert_eq!(ui.connector(id.as_str()), None);
    assert!(!ui.remove_extension(label, tooltip).unwrap());
}

#[test]
fn test_extension_cannot_move_or_be_added_as_component() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let a = ui.create_component("Label");
    let b = ui.create_component("Label");
    let ext = ui.create_extension("Tooltip");
    ui.add_component(layout, a).unwrap();
    ui.add_component(layout, b).unwrap();
    ui.add_extension(a, ext).unwrap();

    assert!(ui.add_extension(b, ext).unwrap_err().is_rejection());
    assert!(ui.add_component(layout, ext).unwrap_err().is_rejection());
    assert!(ui.add_extension(a, b).unwrap_err().is_rejection());
    assert_eq!(ui.parent(ext), Some(a));
}

#[test]
fn test_hidden_target_hides_extension() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let label = ui.create_component("Label");
    let ext = ui.create_extension("Tooltip");
    ui.add_component(layout, label).unwrap();
    ui.add_extension(label, ext).unwrap();
    ui.set_visible(label, false).unwrap();
    ui.mark_all_clean();

    ui.mark_all_dirty();

    assert!(!ui.is_dirty(ext));
    assert!(!ui.is_visible_to_client(ext));
}

// ============================================================================
// IDENTIFIERS
// ============================================================================

#[test]
fn test_preassigned_id_collision_in_subtree() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let branch = ui.create_container(ContainerKind::HorizontalLayout);
    let x = ui.create_component("Label");
    ui.add_component(branch, x).unwrap();
    ui.set_connector_id(x, "1").unwrap();

    let err = ui.add_component(layout, branch).unwrap_err();

    assert!(matches!(err, UiError::DuplicateIdentifier { registered, rejected, .. }
        if registered == layout && rejected == x));
    assert_eq!(ui.parent(branch), None);
    assert!(ui.components(layout).is_empty());
    assert!(ui.connector_id(branch).is_none());
}

#[test]
fn test_generated_ids_avoid_preassigned_ids_in_subtree() {
    let (mut ui, _) = with_root_layout(ContainerKind::VerticalLayout);
    let branch = ui.create_container(ContainerKind::CssLayout);
    let b = ui.create_component("Label");
    let a = ui.create_component("Label");
    ui.add_component(branch, b).unwrap();
    ui.add_component(branch, a).unwrap();
    // "2" goes to the branch and "3" would be next for b
    ui.set_connector_id(a, "3").unwrap();

    ui.set_content(NodeId::ROOT, Some(branch)).unwrap();

    assert!(ui.is_attached(a) && ui.is_attached(b));
    assert_eq!(ui.connector("3"), Some(a));
    let b_id = ui.connector_id(b).cloned().unwrap();
    assert_ne!(b_id.as_str(), "3");
    assert_eq!(ui.connector(b_id.as_str()), Some(b));
    assert_eq!(ui.registry().len(), 4);
}

#[test]
fn test_renaming_detached_connector_waits_for_sweep() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let x = ui.create_component("Label");
    ui.add_component(layout, x).unwrap();
    let dirty = ui.dirty_connectors();
    ui.complete_sync(&dirty);
    let old_id = ui.connector_id(x).cloned().unwrap();

    ui.remove_component(layout, x).unwrap();
    let err = ui.set_connector_id(x, "named").unwrap_err();
    assert!(matches!(err, UiError::UnsupportedStructure { node, .. } if node == x));
    ui.set_connector_id(x, old_id.as_str()).unwrap();

    ui.add_component(layout, x).unwrap();
    assert_eq!(ui.connector(old_id.as_str()), Some(x));
    assert!(ui.clean_connector_map(true).is_empty());
}

#[test]
fn test_renamed_connector_after_sweep_stays_registered() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let x = ui.create_component("Label");
    ui.add_component(layout, x).unwrap();
    let dirty = ui.dirty_connectors();
    ui.complete_sync(&dirty);

    ui.remove_component(layout, x).unwrap();
    let dirty = ui.dirty_connectors();
    assert_eq!(ui.complete_sync(&dirty).released.len(), 1);

    ui.set_connector_id(x, "named").unwrap();
    ui.add_component(layout, x).unwrap();
    assert_eq!(ui.connector("named"), Some(x));

    let report = ui.clean_connector_map(true);
    assert!(report.is_empty());
    assert_eq!(ui.connector("named"), Some(x));
}

#[test]
fn test_rejected_move_leaves_source_intact() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let source = ui.create_container(ContainerKind::CssLayout);
    let a = ui.create_container(ContainerKind::CssLayout);
    let b = ui.create_component("Label");
    let inner = ui.create_container(ContainerKind::VerticalLayout);
    let panel = ui.create_container(ContainerKind::Panel);
    let split = ui.create_container(ContainerKind::HorizontalSplitPanel);
    let occupant = ui.create_component("Label");
    ui.add_component(layout, source).unwrap();
    ui.add_component(layout, panel).unwrap();
    ui.add_component(layout, split).unwrap();
    ui.add_component(source, a).unwrap();
    ui.add_component(source, b).unwrap();
    ui.add_component(a, inner).unwrap();
    ui.add_component(split, occupant).unwrap();

    let err = ui.move_components_from(panel, source).unwrap_err();
    assert!(matches!(err, UiError::UnsupportedStructure { .. }));

    let err = ui.move_components_from(inner, source).unwrap_err();
    assert!(matches!(err, UiError::CyclicContainment { container, child } if container == inner && child == a));

    let err = ui.move_components_from(split, source).unwrap_err();
    assert!(matches!(err, UiError::UnsupportedStructure { .. }));
    assert_eq!(ui.second_component(split), None);

    assert_eq!(ui.components(source), vec![a, b]);
    assert_eq!(ui.parent(a), Some(source));
    assert_eq!(ui.parent(b), Some(source));
    assert!(ui.is_attached(a) && ui.is_attached(b) && ui.is_attached(inner));
}

#[test]
fn test_rejected_replace_leaves_layout_unchanged() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let inner = ui.create_container(ContainerKind::CssLayout);
    let x = ui.create_component("Label");
    ui.add_component(layout, inner).unwrap();
    ui.add_component(inner, x).unwrap();

    let err = ui.replace_component(inner, x, layout).unwrap_err();

    assert!(matches!(err, UiError::CyclicContainment { .. }));
    assert_eq!(ui.components(inner), vec![x]);
    assert_eq!(ui.parent(x), Some(inner));
    assert!(ui.is_attached(x));
    assert_eq!(ui.content(NodeId::ROOT), Some(layout));
}

#[test]
fn test_duplicate_within_detached_subtree() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let branch = ui.create_container(ContainerKind::CssLayout);
    let a = ui.create_component("Label");
    let b = ui.create_component("Label");
    ui.add_component(branch, a).unwrap();
    ui.add_component(branch, b).unwrap();
    ui.set_connector_id(a, "same").unwrap();
    ui.set_connector_id(b, "same").unwrap();

    assert!(matches!(
        ui.add_component(layout, branch),
        Err(UiError::DuplicateIdentifier { .. })
    ));
    assert_eq!(ui.connector("same"), None);
}

#[test]
fn test_generated_ids_skip_taken_ones() {
    let mut ui = Ui::new();
    let label = ui.create_component("Label");
    ui.set_connector_id(label, "1").unwrap();
    ui.set_content(NodeId::ROOT, Some(label)).unwrap();

    let window = ui.create_container(ContainerKind::Window);
    ui.add_window(window).unwrap();

    assert_eq!(ui.connector_id(window).unwrap().as_str(), "2");
}

#[test]
fn test_attached_connector_id_is_fixed() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    assert!(ui.set_connector_id(layout, "other").unwrap_err().is_rejection());
    assert_eq!(ui.connector_id(layout).unwrap().as_str(), "1");
}

// ============================================================================
// STATE AND REGISTRY UPKEEP
// ============================================================================

#[test]
fn test_disabled_container_disables_descendants() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let label = ui.create_component("Label");
    ui.add_component(layout, label).unwrap();
    ui.mark_all_clean();

    ui.set_enabled(layout, false).unwrap();

    assert!(ui.is_enabled(label));
    assert!(!ui.is_connector_enabled(label));
    assert_eq!(ui.dirty_connectors(), vec![layout, label]);

    ui.set_enabled(layout, true).unwrap();
    ui.set_visible(layout, false).unwrap();
    assert!(!ui.is_connector_enabled(label));
}

#[test]
fn test_detached_nodes_are_never_dirty() {
    let mut ui = Ui::new();
    let label = ui.create_component("Label");
    ui.set_caption(label, Some("Name")).unwrap();
    ui.set_width(label, Size::px(10.0)).unwrap();

    assert!(!ui.is_dirty(label));
    assert_eq!(ui.node(label).unwrap().caption(), Some("Name"));
}

#[test]
fn test_dirty_visible_connectors_filter_hidden() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let label = ui.create_component("Label");
    ui.add_component(layout, label).unwrap();
    ui.set_visible(label, false).unwrap();
    ui.mark_all_clean();

    ui.mark_as_dirty(label);

    assert_eq!(ui.dirty_connectors(), vec![label]);
    assert!(ui.dirty_visible_connectors().is_empty());
}

#[test]
fn test_sweep_forgets_hidden_client_state() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let label = ui.create_component("Label");
    ui.add_component(layout, label).unwrap();
    let dirty = ui.dirty_connectors();
    ui.complete_sync(&dirty);
    assert!(ui.is_client_side_initialized(label));

    ui.set_visible(label, false).unwrap();
    ui.clean_connector_map(false);

    assert!(!ui.is_client_side_initialized(label));
    assert!(ui.is_client_side_initialized(layout));
}

#[test]
fn test_sweep_keeps_hidden_state_when_disabled() {
    let mut ui = Ui::with_config(UiConfig {
        forget_hidden_state: false,
        ..UiConfig::default()
    });
    let label = ui.create_component("Label");
    ui.set_content(NodeId::ROOT, Some(label)).unwrap();
    let dirty = ui.dirty_connectors();
    ui.complete_sync(&dirty);

    ui.set_visible(label, false).unwrap();
    ui.clean_connector_map(true);

    assert!(ui.is_client_side_initialized(label));
}

#[test]
fn test_unforced_sweep_waits_for_dirty_connectors() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let label = ui.create_component("Label");
    ui.add_component(layout, label).unwrap();
    let dirty = ui.dirty_connectors();
    ui.complete_sync(&dirty);

    ui.remove_component(layout, label).unwrap();
    ui.mark_all_clean();
    assert!(ui.clean_connector_map(false).is_empty());
    assert_eq!(ui.clean_connector_map(true).released.len(), 1);
}

#[test]
fn test_removed_listener_is_silent() {
    let (mut ui, layout) = with_root_layout(ContainerKind::VerticalLayout);
    let count = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&count);
    let id = ui.add_component_attach_listener(layout, move |_| *sink.lock().unwrap() += 1);
    assert!(ui.remove_listener(id));

    let label = ui.create_component("Label");
    ui.add_component(layout, label).unwrap();

    assert_eq!(*count.lock().unwrap(), 0);
}

#[test]
fn test_healthy_tree_has_no_hierarchy_issues() {
    let (mut ui, split) = with_root_layout(ContainerKind::VerticalSplitPanel);
    let panel = ui.create_container(ContainerKind::Panel);
    let label = ui.create_component("Label");
    let ext = ui.create_extension("Tooltip");
    ui.set_content(panel, Some(label)).unwrap();
    ui.add_extension(label, ext).unwrap();
    ui.add_component(split, panel).unwrap();

    let issues: Vec<HierarchyIssue> = ui.verify_hierarchy();
    assert!(issues.is_empty());
}
