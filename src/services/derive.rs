//! Caller-supplied display derivations for cells

use std::collections::BTreeMap;

/// Extra attributes attached to a square for third-party tooltips
pub type TooltipMap = BTreeMap<String, String>;

pub type ClassFn<V> = Box<dyn Fn(Option<&V>) -> String>;
pub type TitleFn<V> = Box<dyn Fn(Option<&V>) -> Option<String>>;
pub type TooltipFn<V> = Box<dyn Fn(Option<&V>) -> TooltipMap>;
pub type SummaryClassFn<V> = Box<dyn Fn(&[&V]) -> String>;

/// Tooltip attributes: one map for every cell, or computed per cell
pub enum TooltipAttrs<V> {
    Static(TooltipMap),
    /// Called with `None` for cells without a value
    Dynamic(TooltipFn<V>),
}

impl<V> TooltipAttrs<V> {
    pub fn dynamic(f: impl Fn(Option<&V>) -> TooltipMap + 'static) -> Self {
        Self::Dynamic(Box::new(f))
    }

    pub fn resolve(&self, value: Option<&V>) -> TooltipMap {
        match self {
            Self::Static(attrs) => attrs.clone(),
            Self::Dynamic(f) => f(value),
        }
    }
}

impl<V> Default for TooltipAttrs<V> {
    fn default() -> Self {
        Self::Static(TooltipMap::new())
    }
}

/// The pure functions that turn a value (or its absence) into display data.
///
/// Panics inside a callback are not caught.
pub struct Derivations<V> {
    class_for_value: ClassFn<V>,
    title_for_value: Option<TitleFn<V>>,
    tooltip_attrs: TooltipAttrs<V>,
    summary_class: SummaryClassFn<V>,
}

impl<V> Default for Derivations<V> {
    fn default() -> Self {
        Self {
            class_for_value: Box::new(|value| {
                if value.is_some() { "color-filled" } else { "color-empty" }.to_string()
            }),
            title_for_value: None,
            tooltip_attrs: TooltipAttrs::default(),
            summary_class: Box::new(|values| {
                if values.is_empty() { "color-empty" } else { "color-filled" }.to_string()
            }),
        }
    }
}

impl<V> Derivations<V> {
    pub fn with_class_for_value(mut self, f: impl Fn(Option<&V>) -> String + 'static) -> Self {
        self.class_for_value = Box::new(f);
        self
    }

    pub fn with_title_for_value(
        mut self,
        f: impl Fn(Option<&V>) -> Option<String> + 'static,
    ) -> Self {
        self.title_for_value = Some(Box::new(f));
        self
    }

    pub fn with_tooltip_attrs(mut self, attrs: TooltipAttrs<V>) -> Self {
        self.tooltip_attrs = attrs;
        self
    }

    pub fn with_summary_class(mut self, f: impl Fn(&[&V]) -> String + 'static) -> Self {
        self.summary_class = Box::new(f);
        self
    }

    pub fn class_for(&self, value: Option<&V>) -> String {
        (self.class_for_value)(value)
    }

    /// `None` when no title function is configured
    pub fn title_for(&self, value: Option<&V>) -> Option<String> {
        self.title_for_value.as_ref().and_then(|f| f(value))
    }

    pub fn tooltip_for(&self, value: Option<&V>) -> TooltipMap {
        self.tooltip_attrs.resolve(value)
    }

    pub fn summary_class_for(&self, values: &[&V]) -> String {
        (self.summary_class)(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_class_distinguishes_empty() {
        let d: Derivations<i64> = Derivations::default();
        assert_eq!(d.class_for(None), "color-empty");
        // a zero-valued cell still has a value
        assert_eq!(d.class_for(Some(&0)), "color-filled");
    }

    #[test]
    fn test_default_title_is_none() {
        let d: Derivations<i64> = Derivations::default();
        assert_eq!(d.title_for(Some(&3)), None);
    }

    #[test]
    fn test_custom_title() {
        let d: Derivations<i64> =
            Derivations::default().with_title_for_value(|v| v.map(|n| format!("count {}", n)));
        assert_eq!(d.title_for(Some(&3)).as_deref(), Some("count 3"));
        assert_eq!(d.title_for(None), None);
    }

    #[test]
    fn test_static_tooltip_same_for_every_cell() {
        let attrs: TooltipMap = [("data-toggle".to_string(), "tooltip".to_string())].into();
        let d: Derivations<i64> =
            Derivations::default().with_tooltip_attrs(TooltipAttrs::Static(attrs.clone()));
        assert_eq!(d.tooltip_for(Some(&1)), attrs);
        assert_eq!(d.tooltip_for(None), attrs);
    }

    #[test]
    fn test_dynamic_tooltip_gets_none_for_empty() {
        let d: Derivations<i64> =
            Derivations::default().with_tooltip_attrs(TooltipAttrs::dynamic(|v| {
                let text = match v {
                    Some(n) => format!("Count: {}", n),
                    None => "Count: null".to_string(),
                };
                [("data-tooltip".to_string(), text)].into()
            }));
        assert_eq!(d.tooltip_for(Some(&1))["data-tooltip"], "Count: 1");
        assert_eq!(d.tooltip_for(None)["data-tooltip"], "Count: null");
    }

    #[test]
    fn test_summary_class() {
        let d: Derivations<i64> = Derivations::default();
        assert_eq!(d.summary_class_for(&[]), "color-empty");
        assert_eq!(d.summary_class_for(&[&1, &2]), "color-filled");

        let d: Derivations<i64> = Derivations::default()
            .with_summary_class(|vs| format!("week-{}", vs.iter().copied().sum::<i64>()));
        assert_eq!(d.summary_class_for(&[&1, &2]), "week-3");
    }
}
