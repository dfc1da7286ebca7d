//! JSON external form and human-readable summaries.

use std::fmt::Write as _;

use holdfast_heap::{global, HeapRegistry};
use serde_json::Value;

use crate::config::SummaryConfig;
use crate::element::Element;
use crate::error::ListError;
use crate::list::List;

impl<T: Element> List<T> {
    /// Encode as a JSON array of element encodings.
    pub fn to_json(&self) -> Value {
        Value::Array(self.snapshot().iter().map(Element::to_json).collect())
    }

    /// Decode from JSON into the global registry.
    ///
    /// An array yields one element per item; anything else yields an empty
    /// list.
    #[track_caller]
    pub fn from_json(value: &Value) -> Self {
        Self::from_json_in(global(), value)
    }

    /// Decode from JSON into `registry`.
    #[track_caller]
    pub fn from_json_in(registry: &'static HeapRegistry, value: &Value) -> Self {
        let list = Self::new_in(registry);
        match value.as_array() {
            Some(items) => {
                for item in items {
                    list.append(T::from_json(Some(item), registry));
                }
            }
            None => log::debug!("holdfast: decoding non-array list form as an empty list"),
        }
        list
    }

    /// The JSON text of [`to_json`](Self::to_json).
    pub fn to_external_form(&self) -> String {
        self.to_json().to_string()
    }

    /// Parse JSON text into a list in the global registry.
    #[track_caller]
    pub fn from_external_form(text: &str) -> Result<Self, ListError> {
        Self::from_external_form_in(global(), text)
    }

    /// Parse JSON text into a list in `registry`.
    #[track_caller]
    pub fn from_external_form_in(
        registry: &'static HeapRegistry,
        text: &str,
    ) -> Result<Self, ListError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_json_in(registry, &value))
    }

    /// Summary with the default limits.
    pub fn summary(&self) -> String {
        self.summary_with(&SummaryConfig::default())
    }

    /// `"Empty list"`, or an HTML bullet list of item summaries.
    ///
    /// Items stop after `max_items`, or once `max_characters` of item text
    /// has been emitted; a trailing `…` item marks the cut. Blank item
    /// summaries render as `&nbsp;`.
    pub fn summary_with(&self, config: &SummaryConfig) -> String {
        let items = self.snapshot();
        let count = items.len();
        if count == 0 {
            return "Empty list".to_owned();
        }

        let mut summary = format!(
            "List containing {count} item{}: <ul>",
            if count == 1 { "" } else { "s" }
        );
        let mut characters = 0;
        let mut shown = 0;
        for item in &items {
            if shown >= config.max_items || characters > config.max_characters {
                break;
            }
            let text = item.summary();
            if text.trim_matches(' ').is_empty() {
                summary.push_str("\n<li>&nbsp;</li>");
            } else {
                let _ = write!(summary, "\n<li>{text}</li>");
            }
            characters += text.len();
            shown += 1;
        }
        if shown < count {
            summary.push_str("\n<li>…</li>");
        }
        summary.push_str("</ul>");
        summary
    }
}
