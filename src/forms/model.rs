//! Records the generator reads: clients, employees and a single generation request.
//!
//! Clients and employees are owned by the surrounding application (see
//! [`crate::directory`]); the generator never mutates them.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::common::{format_polish_date, non_blank};

/// Auxiliary key/value fields (period, year, tax office, amounts, ...).
pub type AuxFields = BTreeMap<String, String>;

/// Flattened request data keyed by field name, used for template filling.
pub type FieldValues = BTreeMap<String, String>;

/// Postal address of a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    /// Województwo
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Address {
    /// Single-line address ("ul. Biznesowa 123, 00-001 Warszawa").
    ///
    /// Returns `None` when neither street nor locality is filled in.
    pub fn formatted(&self) -> Option<String> {
        let street = non_blank(self.street.as_deref());
        let locality = [
            non_blank(self.zip_code.as_deref()),
            non_blank(self.city.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

        match (street, locality.is_empty()) {
            (Some(street), false) => Some(format!("{street}, {locality}")),
            (Some(street), true) => Some(street.to_string()),
            (None, false) => Some(locality),
            (None, true) => None,
        }
    }
}

/// Client of the accounting office, the principal/taxpayer on a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    /// Tax identification number
    #[serde(default)]
    pub nip: Option<String>,
    /// Statistical registry number
    #[serde(default)]
    pub regon: Option<String>,
    /// National Court Register number
    #[serde(default)]
    pub krs: Option<String>,
    #[serde(default)]
    pub pesel: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
}

impl Client {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    /// "Jan Kowalski", trimmed; empty when both names are blank.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn first_email(&self) -> Option<&str> {
        self.emails.iter().find_map(|email| non_blank(Some(email)))
    }

    pub fn formatted_address(&self) -> Option<String> {
        self.address.as_ref().and_then(Address::formatted)
    }
}

/// Office employee named as attorney or preparer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Employee {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// One generation call: who, which form, and the extra values to print.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub client: Client,
    #[serde(default)]
    pub employee: Option<Employee>,
    pub form_type: String,
    #[serde(default)]
    pub fields: AuxFields,
    /// Issue date; today's local date when omitted.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl GenerationRequest {
    pub fn new(client: Client, employee: Option<Employee>, form_type: impl Into<String>) -> Self {
        Self {
            client,
            employee,
            form_type: form_type.into(),
            fields: AuxFields::new(),
            date: None,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn issued_on(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Auxiliary value, ignoring blanks.
    pub fn field(&self, key: &str) -> Option<&str> {
        non_blank(self.fields.get(key).map(String::as_str))
    }

    /// Flatten client, employee and auxiliary data into one map.
    ///
    /// Record data wins over an auxiliary field with the same key. Blank
    /// values are left out.
    pub fn field_values(&self) -> FieldValues {
        let client = &self.client;
        let mut values = FieldValues::new();
        let mut put = |key: &str, value: Option<&str>| {
            if let Some(value) = non_blank(value) {
                values.insert(key.to_string(), value.to_string());
            }
        };

        put("firstName", Some(&client.first_name));
        put("lastName", Some(&client.last_name));
        put("companyName", client.company_name.as_deref());
        put("nip", client.nip.as_deref());
        put("regon", client.regon.as_deref());
        put("krs", client.krs.as_deref());
        put("pesel", client.pesel.as_deref());
        put("address", client.formatted_address().as_deref());
        put("phone", client.phone.as_deref());
        put("email", client.first_email());

        if let Some(employee) = &self.employee {
            put("employeeFirstName", Some(&employee.first_name));
            put("employeeLastName", Some(&employee.last_name));
            put("employeePosition", employee.position.as_deref());
        }

        put("issueDate", Some(&format_polish_date(self.issued_on())));

        for (key, value) in &self.fields {
            if let Some(value) = non_blank(Some(value)) {
                values
                    .entry(key.clone())
                    .or_insert_with(|| value.to_string());
            }
        }

        values
    }
}
