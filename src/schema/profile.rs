//! # Business Profile Types
//!
//! The typed record produced by a successful extraction. Every field is
//! optional on the wire: absent or `null` values materialize as the field's
//! empty default (`""`, `[]`, `false`), and serialization always emits those
//! defaults instead of `null`.
//!
//! Doc comments on the fields double as the `description`s of the response
//! schema sent to the model, so keep them short and instructive.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` like an absent field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Structured business profile extracted from a website
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BusinessProfile {
    /// Full business name as written on the website
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Every phone number listed, one number per entry
    #[serde(default, deserialize_with = "null_as_default")]
    pub phones: Vec<String>,

    /// Every email address listed, one address per entry
    #[serde(default, deserialize_with = "null_as_default")]
    pub emails: Vec<String>,

    /// Full street addresses including city, state and postal code
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<String>,

    /// Opening hours for each day of the week
    #[serde(default, deserialize_with = "null_as_default")]
    pub business_hours: BusinessHours,

    /// Services offered, one service per entry
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<String>,

    /// Staff members named on the website
    #[serde(default, deserialize_with = "null_as_default")]
    pub staff: Vec<StaffMember>,

    /// Frequently asked questions with their answers
    #[serde(default, deserialize_with = "null_as_default")]
    pub faqs: Vec<Faq>,

    /// Policies (payment, cancellation, appointments), one policy per entry
    #[serde(default, deserialize_with = "null_as_default")]
    pub policies: Vec<String>,

    /// Other relevant details such as parking, accessibility or languages spoken
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_info: String,
}

impl BusinessProfile {
    /// True when no field carries any information
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Names of the top-level fields that hold a non-default value
    pub fn populated_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("name", !self.name.is_empty()),
            ("phones", !self.phones.is_empty()),
            ("emails", !self.emails.is_empty()),
            ("addresses", !self.addresses.is_empty()),
            ("business_hours", !self.business_hours.is_empty()),
            ("services", !self.services.is_empty()),
            ("staff", !self.staff.is_empty()),
            ("faqs", !self.faqs.is_empty()),
            ("policies", !self.policies.is_empty()),
            ("additional_info", !self.additional_info.is_empty()),
        ];
        checks
            .into_iter()
            .filter_map(|(field, populated)| populated.then_some(field))
            .collect()
    }
}

/// Hours for every day of the week
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BusinessHours {
    /// Monday hours
    #[serde(default, deserialize_with = "null_as_default")]
    pub monday: DayHours,
    /// Tuesday hours
    #[serde(default, deserialize_with = "null_as_default")]
    pub tuesday: DayHours,
    /// Wednesday hours
    #[serde(default, deserialize_with = "null_as_default")]
    pub wednesday: DayHours,
    /// Thursday hours
    #[serde(default, deserialize_with = "null_as_default")]
    pub thursday: DayHours,
    /// Friday hours
    #[serde(default, deserialize_with = "null_as_default")]
    pub friday: DayHours,
    /// Saturday hours
    #[serde(default, deserialize_with = "null_as_default")]
    pub saturday: DayHours,
    /// Sunday hours
    #[serde(default, deserialize_with = "null_as_default")]
    pub sunday: DayHours,
}

impl BusinessHours {
    /// Days in week order, Monday first
    pub fn days(&self) -> [(&'static str, &DayHours); 7] {
        [
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
            ("sunday", &self.sunday),
        ]
    }

    /// True when no day is closed and no day lists any service
    pub fn is_empty(&self) -> bool {
        self.days().iter().all(|(_, day)| day.is_empty())
    }
}

/// Hours for a single day, possibly split by service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DayHours {
    /// True only when the website states the business is closed on this day
    #[serde(default, deserialize_with = "null_as_default")]
    pub closed: bool,

    /// Hours per service type; a single entry named "General" when hours are uniform
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<ServiceHours>,
}

impl DayHours {
    pub fn is_empty(&self) -> bool {
        !self.closed && self.services.is_empty()
    }
}

/// Hours of one service on one day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServiceHours {
    /// Service name, e.g. "Regular Hours", "Emergency", "Surgery"
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_name: String,

    /// True when open_time/close_time (or is_24_7) hold the hours, false when hours_string does
    #[serde(default, deserialize_with = "null_as_default")]
    pub parsed: bool,

    /// Original hours text, used when the hours could not be parsed reliably
    #[serde(default, deserialize_with = "null_as_default")]
    pub hours_string: String,

    /// Opening time in 24-hour HH:MM format
    #[serde(default, deserialize_with = "null_as_default")]
    pub open_time: String,

    /// Closing time in 24-hour HH:MM format
    #[serde(default, deserialize_with = "null_as_default")]
    pub close_time: String,

    /// True when the service is available around the clock
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_24_7: bool,

    /// Additional notes about this service's hours
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

impl ServiceHours {
    /// Human readable hours: the parsed range, "24/7", or the verbatim text
    pub fn display_hours(&self) -> String {
        if self.is_24_7 {
            "24/7".to_string()
        } else if self.parsed && !self.open_time.is_empty() {
            format!("{}-{}", self.open_time, self.close_time)
        } else {
            self.hours_string.clone()
        }
    }
}

/// A staff member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StaffMember {
    /// Full name including title
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Role or job title
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,

    /// Area of specialization
    #[serde(default, deserialize_with = "null_as_default")]
    pub specialization: String,

    /// Short biography
    #[serde(default, deserialize_with = "null_as_default")]
    pub bio: String,
}

/// A question and answer pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Faq {
    /// Question as written on the website
    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,

    /// Answer as written on the website
    #[serde(default, deserialize_with = "null_as_default")]
    pub answer: String,
}
