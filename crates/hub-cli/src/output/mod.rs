use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// Print prose (assistant replies, drafts). JSON formats wrap it as
/// `{"<key>": text}` so scripted callers still get a document.
pub fn output_text(key: &str, text: &str, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{text}");
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Raw => {
            let mut doc = serde_json::Map::new();
            doc.insert(key.to_string(), Value::String(text.to_string()));
            output(&Value::Object(doc), format)
        }
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };

    let value = serde_json::to_value(value)?;
    match value {
        Value::Array(items) => render_array_table(&items),
        Value::Object(map) => {
            let headers = ["key", "value"];
            let mut entries = map.into_iter().collect::<Vec<_>>();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut rows = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                rows.push(vec![key, value_to_cell(&value)]);
            }
            Ok(table::render_entity_table(&headers, &rows, options))
        }
        scalar => {
            let headers = ["value"];
            let rows = vec![vec![value_to_cell(&scalar)]];
            Ok(table::render_entity_table(&headers, &rows, options))
        }
    }
}

fn render_array_table(items: &[Value]) -> anyhow::Result<String> {
    let prefs = ui::prefs();
    let options = table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    };

    if items.is_empty() {
        return Ok(String::from("(no rows)"));
    }

    let all_objects = items.iter().all(Value::is_object);
    if !all_objects {
        let headers = ["value"];
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return Ok(table::render_entity_table(&headers, &rows, options));
    }

    let mut headers = Vec::<String>::new();
    for item in items {
        if let Some(map) = item.as_object() {
            for key in map.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
    }

    if headers.is_empty() {
        return Ok(String::from("(no columns)"));
    }

    headers.sort();

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| {
                    map.get(header)
                        .map_or_else(|| String::from("-"), value_to_cell)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    Ok(table::render_entity_table(&header_refs, &rows, options))
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct AppRow {
        id: &'static str,
        title: &'static str,
        downloads: u64,
    }

    fn row() -> AppRow {
        AppRow {
            id: "app-00000001",
            title: "Nebula Dashboard",
            downloads: 12_540,
        }
    }

    #[test]
    fn json_render_is_pretty() {
        let out = render(&row(), OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["title"], "Nebula Dashboard");
        assert!(out.contains('\n'));
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&row(), OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["downloads"], 12_540);
    }

    #[test]
    fn table_render_for_object_lists_keys() {
        let out = render(&row(), OutputFormat::Table).expect("table render should work");
        let first = out.lines().next().unwrap_or_default();
        assert!(first.contains("key"));
        assert!(out.contains("Nebula Dashboard"));
    }

    #[test]
    fn table_render_for_rows_uses_sorted_columns() {
        let out = render(&vec![row(), row()], OutputFormat::Table).expect("table render should work");
        let header: Vec<&str> = out.lines().next().unwrap_or_default().split_whitespace().collect();
        assert_eq!(header, vec!["downloads", "id", "title"]);
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let rows: Vec<AppRow> = Vec::new();
        assert_eq!(render(&rows, OutputFormat::Table).unwrap(), "(no rows)");
    }
}
