//! Static catalog of supported forms.
//!
//! Required/optional lists name the keys of
//! [`GenerationRequest::field_values`](super::model::GenerationRequest::field_values).
//! Template fills write only listed keys; a missing required key is a
//! warning, not an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use super::model::FieldValues;

/// How much identity detail a form prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
        }
    }
}

impl FromStr for Complexity {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "medium" => Ok(Self::Medium),
            "complex" => Ok(Self::Complex),
            other => Err(format!("nieznany poziom złożoności '{other}'")),
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FormCategory {
    /// Powers of attorney
    Pelnomocnictwa,
    Pit,
    Vat,
    Cit,
    Zus,
    Jpk,
    Inne,
}

impl FormCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pelnomocnictwa => "pelnomocnictwa",
            Self::Pit => "pit",
            Self::Vat => "vat",
            Self::Cit => "cit",
            Self::Zus => "zus",
            Self::Jpk => "jpk",
            Self::Inne => "inne",
        }
    }
}

impl FromStr for FormCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pelnomocnictwa" => Ok(Self::Pelnomocnictwa),
            "pit" => Ok(Self::Pit),
            "vat" => Ok(Self::Vat),
            "cit" => Ok(Self::Cit),
            "zus" => Ok(Self::Zus),
            "jpk" => Ok(Self::Jpk),
            "inne" => Ok(Self::Inne),
            other => Err(format!("nieznana kategoria '{other}'")),
        }
    }
}

impl fmt::Display for FormCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry for one form type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormMetadata {
    pub form_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub complexity: Complexity,
    pub category: FormCategory,
    pub required_fields: &'static [&'static str],
    pub optional_fields: &'static [&'static str],
}

impl FormMetadata {
    pub fn is_authorization(&self) -> bool {
        self.category == FormCategory::Pelnomocnictwa
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required_fields.contains(&field)
    }

    /// Whether the form prints `field` at all.
    pub fn lists(&self, field: &str) -> bool {
        self.is_required(field) || self.optional_fields.contains(&field)
    }

    /// The subset of `values` this form prints; other keys are dropped.
    pub fn listed_values(&self, values: &FieldValues) -> FieldValues {
        values
            .iter()
            .filter(|(key, _)| self.lists(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

static CATALOG: &[FormMetadata] = &[
    // Pełnomocnictwa
    FormMetadata {
        form_type: "UPL-1",
        name: "Pełnomocnictwo UPL-1",
        description: "Pełnomocnictwo do podpisywania deklaracji składanych do Urzędu Skarbowego",
        complexity: Complexity::Complex,
        category: FormCategory::Pelnomocnictwa,
        required_fields: &["firstName", "lastName", "nip", "employeeFirstName", "employeeLastName"],
        optional_fields: &[
            "companyName", "regon", "krs", "pesel", "address", "phone", "email",
            "employeePosition", "taxOffice", "startDate", "issueDate",
        ],
    },
    FormMetadata {
        form_type: "UPL-1P",
        name: "Pełnomocnictwo UPL-1P",
        description: "Pełnomocnictwo do podpisywania deklaracji dla podmiotów niebędących osobami fizycznymi",
        complexity: Complexity::Medium,
        category: FormCategory::Pelnomocnictwa,
        required_fields: &["companyName", "nip", "employeeFirstName", "employeeLastName"],
        optional_fields: &["regon", "krs", "address", "phone", "email", "employeePosition", "taxOffice"],
    },
    FormMetadata {
        form_type: "PEL",
        name: "Pełnomocnictwo PEL",
        description: "Pełnomocnictwo do reprezentowania płatnika składek przed ZUS",
        complexity: Complexity::Complex,
        category: FormCategory::Pelnomocnictwa,
        required_fields: &["firstName", "lastName", "nip", "employeeFirstName", "employeeLastName"],
        optional_fields: &[
            "companyName", "regon", "krs", "pesel", "address", "phone", "email",
            "employeePosition", "zusBranch",
        ],
    },
    FormMetadata {
        form_type: "OPL-1",
        name: "Pełnomocnictwo ogólne OPL-1",
        description: "Pełnomocnictwo ogólne do reprezentowania w sprawach podatkowych",
        complexity: Complexity::Medium,
        category: FormCategory::Pelnomocnictwa,
        required_fields: &["firstName", "lastName", "employeeFirstName", "employeeLastName"],
        optional_fields: &["companyName", "nip", "regon", "krs", "address", "phone", "email", "employeePosition"],
    },
    FormMetadata {
        form_type: "PPS-1",
        name: "Pełnomocnictwo szczególne PPS-1",
        description: "Pełnomocnictwo szczególne do jednej sprawy podatkowej",
        complexity: Complexity::Simple,
        category: FormCategory::Pelnomocnictwa,
        required_fields: &["firstName", "lastName", "employeeFirstName", "employeeLastName", "caseDescription"],
        optional_fields: &["companyName", "nip", "employeePosition", "taxOffice"],
    },
    // PIT
    FormMetadata {
        form_type: "PIT-11",
        name: "PIT-11",
        description: "Informacja o przychodach oraz pobranych zaliczkach na podatek dochodowy",
        complexity: Complexity::Medium,
        category: FormCategory::Pit,
        required_fields: &["firstName", "lastName", "nip", "year"],
        optional_fields: &["companyName", "regon", "address", "taxOffice", "revenue", "costs", "advanceTax"],
    },
    FormMetadata {
        form_type: "PIT-4R",
        name: "PIT-4R",
        description: "Deklaracja roczna o pobranych zaliczkach na podatek dochodowy",
        complexity: Complexity::Medium,
        category: FormCategory::Pit,
        required_fields: &["firstName", "lastName", "nip", "year"],
        optional_fields: &["companyName", "regon", "address", "taxOffice", "advanceTax"],
    },
    FormMetadata {
        form_type: "PIT-28",
        name: "PIT-28",
        description: "Zeznanie o wysokości przychodu ewidencjonowanego (ryczałt)",
        complexity: Complexity::Simple,
        category: FormCategory::Pit,
        required_fields: &["firstName", "lastName", "nip", "year"],
        optional_fields: &["companyName", "taxOffice", "revenue", "lumpSumRate", "taxDue"],
    },
    FormMetadata {
        form_type: "PIT-36",
        name: "PIT-36",
        description: "Zeznanie o wysokości osiągniętego dochodu (poniesionej straty)",
        complexity: Complexity::Complex,
        category: FormCategory::Pit,
        required_fields: &["firstName", "lastName", "nip", "year"],
        optional_fields: &[
            "companyName", "regon", "pesel", "address", "phone", "email", "taxOffice",
            "revenue", "costs", "income", "taxDue",
        ],
    },
    FormMetadata {
        form_type: "PIT-37",
        name: "PIT-37",
        description: "Zeznanie o wysokości osiągniętego dochodu (umowa o pracę)",
        complexity: Complexity::Simple,
        category: FormCategory::Pit,
        required_fields: &["firstName", "lastName", "year"],
        optional_fields: &["nip", "pesel", "taxOffice", "income", "taxDue"],
    },
    // VAT
    FormMetadata {
        form_type: "VAT-7",
        name: "VAT-7",
        description: "Deklaracja dla podatku od towarów i usług (miesięczna)",
        complexity: Complexity::Medium,
        category: FormCategory::Vat,
        required_fields: &["nip", "period"],
        optional_fields: &[
            "firstName", "lastName", "companyName", "regon", "address", "taxOffice",
            "vatDue", "vatDeductible", "vatPayable",
        ],
    },
    FormMetadata {
        form_type: "VAT-UE",
        name: "VAT-UE",
        description: "Informacja podsumowująca o dokonanych wewnątrzwspólnotowych transakcjach",
        complexity: Complexity::Simple,
        category: FormCategory::Vat,
        required_fields: &["nip", "period"],
        optional_fields: &["companyName", "taxOffice", "intraCommunitySupply", "intraCommunityAcquisition"],
    },
    FormMetadata {
        form_type: "VAT-R",
        name: "VAT-R",
        description: "Zgłoszenie rejestracyjne w zakresie podatku od towarów i usług",
        complexity: Complexity::Complex,
        category: FormCategory::Vat,
        required_fields: &["firstName", "lastName", "nip"],
        optional_fields: &[
            "companyName", "regon", "krs", "pesel", "address", "phone", "email", "taxOffice",
            "registrationDate", "settlementPeriod",
        ],
    },
    // CIT
    FormMetadata {
        form_type: "CIT-8",
        name: "CIT-8",
        description: "Zeznanie o wysokości osiągniętego dochodu przez podatnika podatku dochodowego od osób prawnych",
        complexity: Complexity::Complex,
        category: FormCategory::Cit,
        required_fields: &["companyName", "nip", "year"],
        optional_fields: &[
            "firstName", "lastName", "regon", "krs", "address", "phone", "email", "taxOffice",
            "revenue", "costs", "income", "taxDue",
        ],
    },
    // ZUS
    FormMetadata {
        form_type: "ZUS-DRA",
        name: "ZUS DRA",
        description: "Deklaracja rozliczeniowa płatnika składek",
        complexity: Complexity::Medium,
        category: FormCategory::Zus,
        required_fields: &["nip", "period"],
        optional_fields: &[
            "firstName", "lastName", "companyName", "regon", "pesel", "address",
            "insuredCount", "contributionBase", "socialContributions", "healthContribution",
        ],
    },
    FormMetadata {
        form_type: "ZUS-ZUA",
        name: "ZUS ZUA",
        description: "Zgłoszenie do ubezpieczeń emerytalnego, rentowych, wypadkowego i zdrowotnego",
        complexity: Complexity::Medium,
        category: FormCategory::Zus,
        required_fields: &["firstName", "lastName", "pesel"],
        optional_fields: &["companyName", "nip", "regon", "address", "zusCode", "startDate"],
    },
    FormMetadata {
        form_type: "ZUS-RCA",
        name: "ZUS RCA",
        description: "Imienny raport miesięczny o należnych składkach i wypłaconych świadczeniach",
        complexity: Complexity::Complex,
        category: FormCategory::Zus,
        required_fields: &["nip", "period"],
        optional_fields: &[
            "firstName", "lastName", "companyName", "regon", "krs", "pesel", "address", "phone",
            "email", "zusCode", "contributionBase", "socialContributions", "healthContribution",
        ],
    },
    // JPK
    FormMetadata {
        form_type: "JPK_V7M",
        name: "JPK_V7M",
        description: "Jednolity plik kontrolny z deklaracją VAT (rozliczenie miesięczne)",
        complexity: Complexity::Complex,
        category: FormCategory::Jpk,
        required_fields: &["nip", "period"],
        optional_fields: &[
            "firstName", "lastName", "companyName", "regon", "krs", "address", "phone", "email",
            "taxOffice", "salesCount", "purchaseCount", "vatDue", "vatDeductible",
        ],
    },
    FormMetadata {
        form_type: "JPK_FA",
        name: "JPK_FA",
        description: "Jednolity plik kontrolny dla faktur VAT",
        complexity: Complexity::Medium,
        category: FormCategory::Jpk,
        required_fields: &["nip", "period"],
        optional_fields: &["companyName", "regon", "address", "taxOffice", "invoiceCount", "grossTotal"],
    },
    // Inne
    FormMetadata {
        form_type: "NIP-8",
        name: "NIP-8",
        description: "Zgłoszenie uzupełniające danych podmiotu",
        complexity: Complexity::Simple,
        category: FormCategory::Inne,
        required_fields: &["nip"],
        optional_fields: &["companyName", "taxOffice", "bankAccount"],
    },
];

/// Every catalog entry, in catalog order.
pub fn all() -> &'static [FormMetadata] {
    CATALOG
}

/// Catalog entry for a form type (case-insensitive).
pub fn lookup(form_type: &str) -> Option<&'static FormMetadata> {
    let form_type = form_type.trim();
    CATALOG
        .iter()
        .find(|meta| meta.form_type.eq_ignore_ascii_case(form_type))
}

pub fn by_category(category: FormCategory) -> Vec<&'static FormMetadata> {
    CATALOG
        .iter()
        .filter(|meta| meta.category == category)
        .collect()
}

pub fn by_complexity(complexity: Complexity) -> Vec<&'static FormMetadata> {
    CATALOG
        .iter()
        .filter(|meta| meta.complexity == complexity)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_form_types_are_unique() {
        let types: HashSet<_> = all().iter().map(|meta| meta.form_type).collect();
        assert_eq!(types.len(), all().len());
    }

    #[test]
    fn test_listed_values_drop_unlisted_keys() {
        let meta = lookup("PIT-11").unwrap();
        let values: FieldValues = [
            ("nip", "1234567890"),
            ("taxOffice", "US Mokotów"),
            ("pesel", "80010112345"),
            ("note", "x"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let listed = meta.listed_values(&values);
        assert_eq!(listed.keys().collect::<Vec<_>>(), vec!["nip", "taxOffice"]);
        assert!(meta.is_required("nip"));
        assert!(!meta.lists("pesel"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let meta = lookup(" upl-1 ").unwrap();
        assert_eq!(meta.form_type, "UPL-1");
        assert!(meta.is_authorization());
        assert!(lookup("FOO-99").is_none());
    }

    #[test]
    fn test_by_category() {
        let authorizations = by_category(FormCategory::Pelnomocnictwa);
        let types: Vec<_> = authorizations.iter().map(|m| m.form_type).collect();
        assert_eq!(types, vec!["UPL-1", "UPL-1P", "PEL", "OPL-1", "PPS-1"]);
        assert_eq!(by_category(FormCategory::Cit).len(), 1);
    }

    #[test]
    fn test_by_complexity() {
        let simple = by_complexity(Complexity::Simple);
        assert!(simple.iter().all(|m| m.complexity == Complexity::Simple));
        assert!(simple.iter().any(|m| m.form_type == "PIT-28"));
    }

    #[test]
    fn test_required_and_optional_do_not_overlap() {
        for meta in all() {
            for field in meta.required_fields {
                assert!(
                    !meta.optional_fields.contains(field),
                    "{} lists {} twice",
                    meta.form_type,
                    field
                );
            }
        }
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!("COMPLEX".parse::<Complexity>(), Ok(Complexity::Complex));
        assert_eq!("zus".parse::<FormCategory>(), Ok(FormCategory::Zus));
        assert!("other".parse::<FormCategory>().is_err());
        assert_eq!(
            serde_json::to_string(&FormCategory::Pelnomocnictwa).unwrap(),
            "\"pelnomocnictwa\""
        );
    }
}
