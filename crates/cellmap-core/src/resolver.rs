//! Candidate resolution.
//!
//! Narrows the registered mappings to the ones that can render a given model
//! at a given index path. More than one candidate is legal, for instance when
//! both an abstraction tag and a concrete tag are registered; callers decide
//! which one wins. Registration order is kept so "first match" is always a
//! meaningful tie-break.

use crate::index_path::IndexPath;
use crate::logging::targets;
use crate::mapping::ViewModelMapping;
use crate::unwrap::{recursively_unwrap, ModelValue};
use crate::view_type::ViewType;

/// Returns the mappings able to render `model` as `view_type` at `index_path`,
/// in input order.
///
/// A mapping is a candidate when its view type equals `view_type`, it accepts
/// the unwrapped model, and its condition accepts `index_path` together with
/// the model as given (still wrapped). An absent model has no candidates.
#[tracing::instrument(
    skip_all,
    target = "cellmap_core::resolver",
    level = "trace",
    fields(view_type = %view_type, index_path = %index_path)
)]
pub fn mapping_candidates<'a, I>(
    mappings: I,
    view_type: &ViewType,
    model: &ModelValue,
    index_path: &IndexPath,
) -> Vec<&'a ViewModelMapping>
where
    I: IntoIterator<Item = &'a ViewModelMapping>,
{
    let Some(unwrapped) = recursively_unwrap(model) else {
        tracing::trace!(target: targets::RESOLVER, "absent model has no candidates");
        return Vec::new();
    };

    let candidates: Vec<_> = mappings
        .into_iter()
        .filter(|mapping| {
            mapping.view_type() == view_type
                && mapping.accepts(unwrapped)
                && mapping.condition().is_compatible(index_path, model)
        })
        .collect();

    tracing::trace!(
        target: targets::RESOLVER,
        model = %unwrapped.model_tag(),
        count = candidates.len(),
        "resolved candidates"
    );
    candidates
}

impl ViewType {
    /// Returns the mappings able to render `model` as this view type.
    ///
    /// See [`mapping_candidates`].
    pub fn mapping_candidates<'a, I>(
        &self,
        mappings: I,
        model: &ModelValue,
        index_path: &IndexPath,
    ) -> Vec<&'a ViewModelMapping>
    where
        I: IntoIterator<Item = &'a ViewModelMapping>,
    {
        mapping_candidates(mappings, self, model, index_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::MappingCondition;
    use crate::container::ReusableView;
    use crate::model::{ModelTag, ModelType};

    const ANIMAL: ModelTag = ModelTag::new("Animal");

    struct Dog;

    impl ModelType for Dog {
        const TAG: ModelTag = ModelTag::new("Dog");
        const CONFORMS_TO: &'static [ModelTag] = &[ANIMAL];
    }

    struct Cat;

    impl ModelType for Cat {
        const TAG: ModelTag = ModelTag::new("Cat");
        const CONFORMS_TO: &'static [ModelTag] = &[ANIMAL];
    }

    #[derive(Default)]
    struct Row;

    impl ReusableView for Row {
        fn create() -> Self {
            Row
        }
    }

    fn int_cell() -> ViewModelMapping {
        ViewModelMapping::cell::<Row, i32>(|_, _, _| {})
    }

    fn manual_cell(tag: ModelTag) -> ViewModelMapping {
        ViewModelMapping::manual(
            ViewType::Cell,
            tag,
            tag.name(),
            crate::container::ViewTemplate::inline(|| Box::new(Row)),
            |_, _| {},
        )
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("cellmap_core=trace")
            .with_test_writer()
            .try_init();
    }

    fn ptrs(candidates: &[&ViewModelMapping]) -> Vec<*const ViewModelMapping> {
        candidates.iter().map(|m| *m as *const _).collect()
    }

    #[test]
    fn test_single_int_cell() {
        let mappings = [int_cell()];
        let candidates = ViewType::Cell.mapping_candidates(
            &mappings,
            &ModelValue::new(5i32),
            &IndexPath::new(0, 0),
        );
        assert_eq!(ptrs(&candidates), vec![&mappings[0] as *const _]);
    }

    #[test]
    fn test_header_request_does_not_match_cell() {
        let mappings = [int_cell()];
        let candidates = ViewType::header().mapping_candidates(
            &mappings,
            &ModelValue::new(5i32),
            &IndexPath::new(0, 0),
        );
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_section_condition_excludes() {
        init_tracing();
        let mappings = [
            int_cell().with_condition(MappingCondition::Section(0)),
            int_cell(),
        ];
        let candidates = ViewType::Cell.mapping_candidates(
            &mappings,
            &ModelValue::new(5i32),
            &IndexPath::new(1, 0),
        );
        assert_eq!(ptrs(&candidates), vec![&mappings[1] as *const _]);

        let candidates = ViewType::Cell.mapping_candidates(
            &mappings,
            &ModelValue::new(5i32),
            &IndexPath::new(0, 0),
        );
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_absent_model_has_no_candidates() {
        let mappings = [int_cell(), manual_cell(ANIMAL)];
        let model = ModelValue::Absent.wrapped().wrapped();
        for view_type in [ViewType::Cell, ViewType::header()] {
            assert!(view_type
                .mapping_candidates(&mappings, &model, &IndexPath::default())
                .is_empty());
        }
    }

    #[test]
    fn test_empty_mapping_set() {
        let mappings: Vec<ViewModelMapping> = Vec::new();
        assert!(ViewType::Cell
            .mapping_candidates(&mappings, &ModelValue::new(1i32), &IndexPath::default())
            .is_empty());
    }

    #[test]
    fn test_unmatched_model_type() {
        let mappings = [int_cell()];
        assert!(ViewType::Cell
            .mapping_candidates(&mappings, &ModelValue::new(1u8), &IndexPath::default())
            .is_empty());
    }

    #[test]
    fn test_abstraction_and_concrete_in_registration_order() {
        init_tracing();
        let mappings = [manual_cell(ANIMAL), manual_cell(Dog::TAG), manual_cell(Cat::TAG)];
        let candidates = ViewType::Cell.mapping_candidates(
            &mappings,
            &ModelValue::new(Dog),
            &IndexPath::default(),
        );
        assert_eq!(
            ptrs(&candidates),
            vec![&mappings[0] as *const _, &mappings[1] as *const _]
        );
    }

    #[test]
    fn test_condition_receives_original_model() {
        let mappings = [int_cell().with_condition(MappingCondition::custom(|_, model| {
            matches!(model, ModelValue::Wrapped(_))
        }))];
        let path = IndexPath::default();
        assert_eq!(
            ViewType::Cell
                .mapping_candidates(&mappings, &ModelValue::new(1i32).wrapped(), &path)
                .len(),
            1
        );
        assert!(ViewType::Cell
            .mapping_candidates(&mappings, &ModelValue::new(1i32), &path)
            .is_empty());
    }

    #[test]
    fn test_candidates_only_of_requested_view_type() {
        let mappings = [
            ViewModelMapping::header::<Row, i32>(|_, _, _| {}),
            int_cell(),
            ViewModelMapping::footer::<Row, i32>(|_, _, _| {}),
            int_cell().with_condition(MappingCondition::Section(3)),
        ];
        let model = ModelValue::new(8i32);
        for view_type in [ViewType::Cell, ViewType::header(), ViewType::footer()] {
            for section in 0..5 {
                let path = IndexPath::new(section, 0);
                let candidates = view_type.mapping_candidates(&mappings, &model, &path);
                assert!(!candidates.is_empty());
                assert!(candidates.iter().all(|m| m.view_type() == &view_type));
                // Relative order matches the input order.
                let positions: Vec<usize> = candidates
                    .iter()
                    .map(|c| mappings.iter().position(|m| std::ptr::eq(m, *c)).unwrap())
                    .collect();
                assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn test_rejected_model_excluded_whatever_the_condition() {
        let always = MappingCondition::custom(|_, _| true);
        let mappings = [
            int_cell().with_condition(always.clone()),
            int_cell().with_condition(MappingCondition::Section(0)),
            manual_cell(Cat::TAG).with_condition(always.clone()),
            ViewModelMapping::cell::<Row, Cat>(|_, _, _| {}).with_condition(always),
        ];
        let path = IndexPath::new(0, 0);
        assert!(ViewType::Cell
            .mapping_candidates(&mappings, &ModelValue::new(String::from("x")), &path)
            .is_empty());
        assert!(ViewType::Cell
            .mapping_candidates(&mappings, &ModelValue::new(Dog), &path)
            .is_empty());
    }

    #[test]
    fn test_typed_concrete_and_conforming_abstraction() {
        let mappings = [
            ViewModelMapping::conforming_cell::<Row>(ANIMAL, |_, _, _| {}),
            ViewModelMapping::cell::<Row, Dog>(|_, _, _| {}),
            ViewModelMapping::cell::<Row, Cat>(|_, _, _| {}),
        ];
        let candidates = ViewType::Cell.mapping_candidates(
            &mappings,
            &ModelValue::new(Dog),
            &IndexPath::default(),
        );
        assert_eq!(
            ptrs(&candidates),
            vec![&mappings[0] as *const _, &mappings[1] as *const _]
        );
    }
}
