//! # Extraction Contract
//!
//! The versioned pairing of instruction text and response schema sent with
//! every extraction request. Both halves are generated here: the schema from
//! the [`BusinessProfile`] types, the instructions from [`FIELD_GUIDE`].
//! Changing a field means changing the type, its guide entry and
//! [`SCHEMA_VERSION`] together.

use schemars::r#gen::SchemaSettings;
use serde::Serialize;
use serde_json::{Map, Value};

use super::BusinessProfile;

/// Version of the profile schema and its instructions
pub const SCHEMA_VERSION: u32 = 2;

/// Schema keywords accepted by Gemini's `responseSchema`
const ALLOWED_KEYWORDS: &[&str] = &[
    "type",
    "properties",
    "items",
    "description",
    "enum",
    "nullable",
    "required",
];

/// Instruction entry for one top-level profile field
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldGuide {
    /// Field name as it appears in the schema
    pub field: &'static str,

    /// What to extract
    pub extract: &'static str,

    /// How to format it
    pub format: &'static str,

    /// Value to use when nothing is found
    pub empty: &'static str,
}

/// One entry per top-level [`BusinessProfile`] field, in schema order
pub const FIELD_GUIDE: &[FieldGuide] = &[
    FieldGuide {
        field: "name",
        extract: "The full business name.",
        format: "A single string, exactly as written on the website.",
        empty: "\"\" (empty string)",
    },
    FieldGuide {
        field: "phones",
        extract: "Every phone number listed for the business.",
        format: "An array of strings, one number per entry, even when there is only one.",
        empty: "[] (empty array)",
    },
    FieldGuide {
        field: "emails",
        extract: "Every email address listed for the business.",
        format: "An array of strings, one address per entry, even when there is only one.",
        empty: "[] (empty array)",
    },
    FieldGuide {
        field: "addresses",
        extract: "Every physical location of the business.",
        format: "An array of strings, each a full street address including city, state and postal code.",
        empty: "[] (empty array)",
    },
    FieldGuide {
        field: "business_hours",
        extract: "Opening hours for each day from monday through sunday.",
        format: "An object with all seven days. Each day is an object with \"closed\" (true only when the website says the business is closed that day) and \"services\" (a list of service hours). Use one service named \"General\" when hours are the same for everything, otherwise one entry per service (e.g. \"Regular Hours\", \"Emergency\", \"Surgery\"). For each service: when the hours can be read as clear times set parsed=true and open_time/close_time in 24-hour HH:MM format (e.g. \"08:00\", \"20:00\"), or is_24_7=true for round-the-clock service; when they cannot be parsed reliably set parsed=false and copy the original text into hours_string (e.g. \"8am to 8pm\", \"Call for hours\"). Put any extra remarks in notes. Never give a day as a plain string.",
        empty: "every day {\"closed\": false, \"services\": []}; unused service strings \"\", unused flags false",
    },
    FieldGuide {
        field: "services",
        extract: "All services or products offered.",
        format: "An array of strings, one service per entry.",
        empty: "[] (empty array)",
    },
    FieldGuide {
        field: "staff",
        extract: "All staff members mentioned by name.",
        format: "An array of objects with name, role, specialization and bio strings.",
        empty: "[] (empty array); unknown member fields \"\"",
    },
    FieldGuide {
        field: "faqs",
        extract: "Frequently asked questions together with their answers.",
        format: "An array of objects with question and answer strings.",
        empty: "[] (empty array)",
    },
    FieldGuide {
        field: "policies",
        extract: "Stated policies such as payment, cancellation, appointments or insurance.",
        format: "An array of strings, one policy per entry.",
        empty: "[] (empty array)",
    },
    FieldGuide {
        field: "additional_info",
        extract: "Other relevant details: parking, accessibility, languages spoken, payment methods.",
        format: "A single string; separate distinct items with semicolons.",
        empty: "\"\" (empty string)",
    },
];

/// Instructions and response schema for one schema version
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionContract {
    /// Schema version shared by both halves
    pub version: u32,

    /// Natural-language instructions preceding the website content
    pub instructions: String,

    /// Response schema in the form Gemini accepts
    pub schema: Value,
}

impl ExtractionContract {
    /// Contract for the current [`SCHEMA_VERSION`]
    pub fn current() -> Result<Self, serde_json::Error> {
        Ok(Self {
            version: SCHEMA_VERSION,
            instructions: render_instructions(),
            schema: response_schema()?,
        })
    }
}

/// Response schema derived from [`BusinessProfile`]
pub fn response_schema() -> Result<Value, serde_json::Error> {
    let generator = SchemaSettings::openapi3()
        .with(|settings| {
            settings.inline_subschemas = true;
            settings.meta_schema = None;
        })
        .into_generator();
    let root = generator.into_root_schema_for::<BusinessProfile>();
    let schema = serde_json::to_value(root.schema)?;
    Ok(reduce(schema))
}

/// Keep only the keywords Gemini understands, upper-casing type names
fn reduce(schema: Value) -> Value {
    let Value::Object(mut object) = schema else {
        return schema;
    };

    // Metadata on an inlined struct can arrive wrapped in a single allOf
    if let Some(Value::Array(mut all_of)) = object.remove("allOf") {
        if all_of.len() == 1 {
            if let Value::Object(inner) = all_of.remove(0) {
                for (key, value) in inner {
                    object.entry(key).or_insert(value);
                }
            }
        }
    }

    let mut reduced = Map::new();
    for (key, value) in object {
        if !ALLOWED_KEYWORDS.contains(&key.as_str()) {
            continue;
        }
        let value = match (key.as_str(), value) {
            ("type", Value::String(name)) => Value::String(name.to_uppercase()),
            ("properties", Value::Object(properties)) => Value::Object(
                properties
                    .into_iter()
                    .map(|(name, property)| (name, reduce(property)))
                    .collect(),
            ),
            ("items", items) => reduce(items),
            // Nothing is ever required to be found
            ("required", _) => continue,
            (_, value) => value,
        };
        reduced.insert(key, value);
    }
    Value::Object(reduced)
}

fn render_instructions() -> String {
    let mut text = String::from(
        "You are a data extraction specialist. Extract structured information about the business \
         described by the website content below.\n\n\
         Only include information explicitly stated on the website. Never guess or invent values. \
         When a field is not found, use its empty default exactly as listed; never use null.\n\n",
    );
    text.push_str(&format!("FIELDS (schema version {}):\n", SCHEMA_VERSION));
    for (index, guide) in FIELD_GUIDE.iter().enumerate() {
        text.push_str(&format!(
            "{}. {}: {} Format: {} If not found: {}.\n",
            index + 1,
            guide.field,
            guide.extract,
            guide.format,
            guide.empty
        ));
    }
    text.push_str("\nWebsite content:");
    text
}
