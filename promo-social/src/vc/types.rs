use serde::{Deserialize, Deserializer, Serialize};

/// Envelope of `GET /timeline`: `{result: {items: [{data: Entry}]}}`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Timeline {
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: TimelineResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimelineResult {
    #[serde(default, deserialize_with = "null_items_as_default")]
    pub items: Vec<TimelineItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimelineItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Entry,
}

/// One post on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Entry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Publication time, unix seconds.
    #[serde(rename = "date", default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
}

impl Timeline {
    /// Flatten the envelope into entries, keeping the server's order.
    pub fn into_entries(self) -> Vec<Entry> {
        self.result.items.into_iter().map(|item| item.data).collect()
    }
}

// Non-post items carry `null` where posts carry values.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// A `null` slot in `items` stands for an empty item, not a decode failure.
fn null_items_as_default<'de, D>(deserializer: D) -> Result<Vec<TimelineItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Option<TimelineItem>>>::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}
