//! Part and display-mode filtering
//!
//! Multi-part components draw only the objects that belong to the selected
//! part, and components with alternate symbols only those of the selected
//! display mode. The checks below fall through in a fixed order; objects with
//! partial scoping depend on that order.

use crate::model::{ObjectId, SchematicDocument};

/// Whether object `id` should be drawn for its component's current selection.
/// Unknown ids are not visible.
pub fn is_visible(doc: &SchematicDocument, id: ObjectId) -> bool {
    let Some(object) = doc.get(id) else {
        return false;
    };
    if object.hidden {
        return false;
    }

    let owner = object.owner;
    let owner_part = owner.part_id.filter(|p| *p >= 1);
    if owner_part.is_none() && owner.display_mode == Some(-1) {
        return true;
    }

    let Some((_, component)) = doc.owning_component(id) else {
        return true;
    };

    let selected_part = component.current_part_id.filter(|p| *p >= 1);
    let selected_mode = component.display_mode;
    if selected_part.is_none() && selected_mode < 1 {
        return true;
    }

    let Some(selected_part) = selected_part else {
        return owner.display_mode == Some(selected_mode);
    };

    let part_matches = owner.part_id == Some(selected_part);
    match owner.display_mode {
        Some(mode) if selected_mode >= 1 => part_matches && mode == selected_mode,
        _ => part_matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, Pin, SchObject};

    fn doc_with_component(part: Option<i32>, mode: i32) -> (SchematicDocument, ObjectId) {
        let mut doc = SchematicDocument::default();
        let c = doc.push(SchObject::new(Component {
            current_part_id: part,
            display_mode: mode,
            part_count: 2,
            ..Default::default()
        }));
        (doc, c)
    }

    fn pin(part: Option<i32>, mode: Option<i32>) -> SchObject {
        SchObject::new(Pin::default()).with_owner(part, mode)
    }

    #[test]
    fn matching_part_and_mode_is_visible() {
        let (mut doc, c) = doc_with_component(Some(2), 1);
        let yes = doc.push_child(c, pin(Some(2), Some(1)));
        let wrong_part = doc.push_child(c, pin(Some(1), Some(1)));
        let wrong_mode = doc.push_child(c, pin(Some(2), Some(0)));
        assert!(is_visible(&doc, yes));
        assert!(!is_visible(&doc, wrong_part));
        assert!(!is_visible(&doc, wrong_mode));
    }

    #[test]
    fn unscoped_objects_are_always_visible() {
        for (part, mode) in [(Some(2), 1), (None, 0), (Some(1), 3), (None, 2)] {
            let (mut doc, c) = doc_with_component(part, mode);
            let id = doc.push_child(c, pin(None, Some(-1)));
            assert!(is_visible(&doc, id), "part {part:?} mode {mode}");
            let zero_part = doc.push_child(c, pin(Some(0), Some(-1)));
            assert!(is_visible(&doc, zero_part));
        }
    }

    #[test]
    fn hidden_wins_over_everything() {
        let mut doc = SchematicDocument::default();
        let id = doc.push(SchObject::new(Pin::default()).with_hidden(true));
        assert!(!is_visible(&doc, id));
    }

    #[test]
    fn orphans_are_visible() {
        let mut doc = SchematicDocument::default();
        let id = doc.push(pin(Some(3), Some(2)));
        assert!(is_visible(&doc, id));
    }

    #[test]
    fn component_without_selection_shows_everything() {
        let (mut doc, c) = doc_with_component(None, 0);
        let id = doc.push_child(c, pin(Some(4), Some(2)));
        assert!(is_visible(&doc, id));
    }

    #[test]
    fn mode_only_selection_compares_modes() {
        let (mut doc, c) = doc_with_component(None, 2);
        let same = doc.push_child(c, pin(Some(1), Some(2)));
        let other = doc.push_child(c, pin(Some(1), Some(1)));
        let undeclared = doc.push_child(c, pin(Some(1), None));
        assert!(is_visible(&doc, same));
        assert!(!is_visible(&doc, other));
        assert!(!is_visible(&doc, undeclared));
    }

    #[test]
    fn primary_mode_compares_parts_only() {
        let (mut doc, c) = doc_with_component(Some(2), 0);
        let same = doc.push_child(c, pin(Some(2), Some(5)));
        let other = doc.push_child(c, pin(Some(1), Some(0)));
        assert!(is_visible(&doc, same));
        assert!(!is_visible(&doc, other));
    }

    #[test]
    fn undeclared_owner_mode_compares_parts_only() {
        let (mut doc, c) = doc_with_component(Some(2), 1);
        let same = doc.push_child(c, pin(Some(2), None));
        let other = doc.push_child(c, pin(Some(3), None));
        assert!(is_visible(&doc, same));
        assert!(!is_visible(&doc, other));
    }

    #[test]
    fn fully_undeclared_scope_is_filtered_by_part() {
        let (mut doc, c) = doc_with_component(Some(2), 1);
        let id = doc.push_child(c, pin(None, None));
        assert!(!is_visible(&doc, id));

        // Without a selection there is nothing to filter against
        let (mut doc, c) = doc_with_component(None, 0);
        let id = doc.push_child(c, pin(None, None));
        assert!(is_visible(&doc, id));
    }

    #[test]
    fn unknown_id_is_not_visible() {
        let doc = SchematicDocument::default();
        assert!(!is_visible(&doc, ObjectId(3)));
    }
}
