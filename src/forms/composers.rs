//! Per-form composers for synthesized documents.
//!
//! Each form type maps to a plain function producing a [`Drawing`]. Forms
//! share the identity sections from [`super::sections`] and one of two
//! profiles: authorization (principal, attorney, scope of authority) or
//! declaration (party, period lines, amount placeholders).

use chrono::NaiveDate;

use super::layout::{Drawing, PageWriter};
use super::metadata::FormMetadata;
use super::model::{FieldValues, GenerationRequest};
use super::sections::{
    attorney_section, closing_section, identity_section, labeled, labeled_or_blank,
    scope_section,
};

/// Everything a composer may read.
pub struct FormContext<'a> {
    pub meta: &'static FormMetadata,
    pub request: &'a GenerationRequest,
    pub values: &'a FieldValues,
    pub issued_on: NaiveDate,
}

impl FormContext<'_> {
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

pub type Composer = fn(&FormContext<'_>) -> Drawing;

/// Composer for a form type; `None` for types rendered only from templates.
pub fn composer_for(form_type: &str) -> Option<Composer> {
    let composer: Composer = match form_type {
        "UPL-1P" => upl1p,
        "PEL" => pel,
        "OPL-1" => opl1,
        "PPS-1" => pps1,
        "PIT-11" => pit11,
        "PIT-4R" => pit4r,
        "PIT-28" => pit28,
        "PIT-36" => pit36,
        "PIT-37" => pit37,
        "VAT-7" => vat7,
        "VAT-UE" => vat_ue,
        "VAT-R" => vat_r,
        "CIT-8" => cit8,
        "ZUS-DRA" => zus_dra,
        "ZUS-ZUA" => zus_zua,
        "ZUS-RCA" => zus_rca,
        "JPK_V7M" => jpk_v7m,
        "JPK_FA" => jpk_fa,
        "NIP-8" => nip8,
        _ => return None,
    };
    Some(composer)
}

struct Authorization {
    title: &'static [&'static str],
    principal: &'static str,
    scope: &'static [&'static str],
    /// (label, field key) lines after the scope, blank when not supplied
    details: &'static [(&'static str, &'static str)],
    captions: [&'static str; 2],
    note: &'static [&'static str],
}

struct Declaration {
    title: &'static [&'static str],
    party: &'static str,
    details_heading: &'static str,
    details: &'static [(&'static str, &'static str)],
    amounts: &'static [(&'static str, &'static str)],
    captions: &'static [&'static str],
}

fn authorization(ctx: &FormContext<'_>, form: &Authorization) -> Drawing {
    let mut writer = PageWriter::new();
    writer.title(form.title);
    identity_section(
        &mut writer,
        form.principal,
        &ctx.request.client,
        ctx.meta.complexity.into(),
    );
    attorney_section(&mut writer, ctx.request.employee.as_ref());
    scope_section(&mut writer, form.scope);
    if !form.details.is_empty() {
        for (label, key) in form.details {
            labeled_or_blank(&mut writer, label, ctx.value(key));
        }
        writer.gap(10.0);
    }
    closing_section(&mut writer, ctx.issued_on, &form.captions);
    writer.gap(8.0);
    writer.note(form.note);
    writer.finish()
}

fn declaration(ctx: &FormContext<'_>, form: &Declaration) -> Drawing {
    let mut writer = PageWriter::new();
    writer.title(form.title);
    identity_section(
        &mut writer,
        form.party,
        &ctx.request.client,
        ctx.meta.complexity.into(),
    );

    writer.heading(form.details_heading);
    for (label, key) in form.details {
        labeled_or_blank(&mut writer, label, ctx.value(key));
    }
    writer.gap(5.0);

    if !form.amounts.is_empty() {
        writer.heading("WYLICZENIE:");
        for (label, key) in form.amounts {
            labeled_or_blank(&mut writer, label, ctx.value(key));
        }
        writer.gap(5.0);
    }

    if let Some(employee) = &ctx.request.employee {
        labeled(&mut writer, "Sporządził(a)", Some(&employee.full_name()));
        writer.gap(5.0);
    }

    closing_section(&mut writer, ctx.issued_on, form.captions);
    writer.finish()
}

// ---------------------------------------------------------------------------
// Pełnomocnictwa
// ---------------------------------------------------------------------------

pub const TAX_OFFICE_SCOPE: &[&str] = &[
    "Reprezentowania mocodawcy przed organami skarbowymi",
    "Składania deklaracji podatkowych i innych dokumentów",
    "Odbierania korespondencji związanej ze sprawami podatkowymi",
    "Dostępu do informacji podatkowych mocodawcy",
    "Podpisywania dokumentów w imieniu mocodawcy",
    "Składania wniosków i odwołań w sprawach podatkowych",
];

const SIGNATURE_NOTE: &[&str] = &[
    "Uwaga: Pełnomocnictwo wymaga podpisu z potwierdzeniem własnoręczności podpisu",
    "lub kwalifikowanego podpisu elektronicznego.",
];

const UPL1P: Authorization = Authorization {
    title: &["PEŁNOMOCNICTWO UPL-1P", "do podpisywania deklaracji podmiotu"],
    principal: "MOCODAWCA (PODMIOT):",
    scope: TAX_OFFICE_SCOPE,
    details: &[("Urząd skarbowy", "taxOffice")],
    captions: ["(Podpis osoby reprezentującej)", "(Podpis pełnomocnika)"],
    note: SIGNATURE_NOTE,
};

const PEL: Authorization = Authorization {
    title: &["PEŁNOMOCNICTWO PEL", "do Zakładu Ubezpieczeń Społecznych"],
    principal: "PŁATNIK SKŁADEK:",
    scope: &[
        "Reprezentowania płatnika składek przed ZUS",
        "Składania dokumentów rozliczeniowych i deklaracji ZUS",
        "Odbierania korespondencji od ZUS",
        "Dostępu do danych zgromadzonych w ZUS dotyczących płatnika",
        "Składania wniosków i odwołań w sprawach ubezpieczeniowych",
        "Dokonywania wszelkich czynności związanych z ubezpieczeniami społecznymi",
        "Zgłaszania i wyrejestrowywania ubezpieczonych",
    ],
    details: &[("Oddział ZUS", "zusBranch")],
    captions: ["(Podpis płatnika składek)", "(Podpis pełnomocnika)"],
    note: &[
        "Uwaga: Pełnomocnictwo wymaga potwierdzenia przez notariusza, organ sądowy,",
        "organ administracji rządowej lub samorządowej lub kwalifikowanego podpisu elektronicznego.",
    ],
};

const OPL1: Authorization = Authorization {
    title: &["PEŁNOMOCNICTWO OGÓLNE OPL-1", "do reprezentowania w sprawach podatkowych"],
    principal: "MOCODAWCA:",
    scope: &[
        "Reprezentowania mocodawcy we wszystkich sprawach podatkowych",
        "Dokonywania czynności przed organami podatkowymi i kontroli skarbowej",
        "Odbierania pism i doręczeń w sprawach podatkowych",
        "Udzielania dalszych pełnomocnictw szczególnych",
    ],
    details: &[],
    captions: ["(Podpis mocodawcy)", "(Podpis pełnomocnika)"],
    note: &[
        "Uwaga: Pełnomocnictwo ogólne składa się w formie elektronicznej",
        "do Centralnego Rejestru Pełnomocnictw Ogólnych.",
    ],
};

const PPS1: Authorization = Authorization {
    title: &["PEŁNOMOCNICTWO SZCZEGÓLNE PPS-1", "w sprawie podatkowej"],
    principal: "MOCODAWCA:",
    scope: &[
        "Reprezentowania mocodawcy w sprawie wskazanej poniżej",
        "Składania pism i wyjaśnień w tej sprawie",
        "Odbierania korespondencji dotyczącej tej sprawy",
    ],
    details: &[("Sprawa", "caseDescription"), ("Organ podatkowy", "taxOffice")],
    captions: ["(Podpis mocodawcy)", "(Podpis pełnomocnika)"],
    note: &["Uwaga: Od pełnomocnictwa szczególnego pobiera się opłatę skarbową."],
};

fn upl1p(ctx: &FormContext<'_>) -> Drawing {
    authorization(ctx, &UPL1P)
}

fn pel(ctx: &FormContext<'_>) -> Drawing {
    authorization(ctx, &PEL)
}

fn opl1(ctx: &FormContext<'_>) -> Drawing {
    authorization(ctx, &OPL1)
}

fn pps1(ctx: &FormContext<'_>) -> Drawing {
    authorization(ctx, &PPS1)
}

// ---------------------------------------------------------------------------
// Deklaracje
// ---------------------------------------------------------------------------

const YEAR_AND_OFFICE: &[(&str, &str)] = &[("Rok podatkowy", "year"), ("Urząd skarbowy", "taxOffice")];
const PERIOD_AND_OFFICE: &[(&str, &str)] = &[
    ("Okres rozliczeniowy", "period"),
    ("Urząd skarbowy", "taxOffice"),
];
const INCOME_CALCULATION: &[(&str, &str)] = &[
    ("Przychód (zł)", "revenue"),
    ("Koszty uzyskania przychodu (zł)", "costs"),
    ("Dochód (zł)", "income"),
    ("Podatek należny (zł)", "taxDue"),
];
const ZUS_CONTRIBUTIONS: &[(&str, &str)] = &[
    ("Podstawa wymiaru składek (zł)", "contributionBase"),
    ("Składki na ubezpieczenia społeczne (zł)", "socialContributions"),
    ("Składka na ubezpieczenie zdrowotne (zł)", "healthContribution"),
];

const PIT11: Declaration = Declaration {
    title: &["PIT-11", "Informacja o przychodach oraz pobranych zaliczkach"],
    party: "PŁATNIK:",
    details_heading: "DANE DEKLARACJI:",
    details: YEAR_AND_OFFICE,
    amounts: &[
        ("Przychód (zł)", "revenue"),
        ("Koszty uzyskania przychodu (zł)", "costs"),
        ("Pobrana zaliczka na podatek (zł)", "advanceTax"),
    ],
    captions: &["(Podpis płatnika)"],
};

const PIT4R: Declaration = Declaration {
    title: &["PIT-4R", "Deklaracja roczna o pobranych zaliczkach na podatek dochodowy"],
    party: "PŁATNIK:",
    details_heading: "DANE DEKLARACJI:",
    details: YEAR_AND_OFFICE,
    amounts: &[("Suma pobranych zaliczek (zł)", "advanceTax")],
    captions: &["(Podpis płatnika)"],
};

const PIT28: Declaration = Declaration {
    title: &["PIT-28", "Zeznanie o wysokości przychodu ewidencjonowanego"],
    party: "PODATNIK:",
    details_heading: "DANE DEKLARACJI:",
    details: YEAR_AND_OFFICE,
    amounts: &[
        ("Przychód (zł)", "revenue"),
        ("Stawka ryczałtu (%)", "lumpSumRate"),
        ("Ryczałt należny (zł)", "taxDue"),
    ],
    captions: &["(Podpis podatnika)"],
};

const PIT36: Declaration = Declaration {
    title: &["PIT-36", "Zeznanie o wysokości osiągniętego dochodu (poniesionej straty)"],
    party: "PODATNIK:",
    details_heading: "DANE DEKLARACJI:",
    details: YEAR_AND_OFFICE,
    amounts: INCOME_CALCULATION,
    captions: &["(Podpis podatnika)", "(Podpis małżonka)"],
};

const PIT37: Declaration = Declaration {
    title: &["PIT-37", "Zeznanie o wysokości osiągniętego dochodu"],
    party: "PODATNIK:",
    details_heading: "DANE DEKLARACJI:",
    details: YEAR_AND_OFFICE,
    amounts: &[("Dochód (zł)", "income"), ("Podatek należny (zł)", "taxDue")],
    captions: &["(Podpis podatnika)", "(Podpis małżonka)"],
};

const VAT7: Declaration = Declaration {
    title: &["VAT-7", "Deklaracja dla podatku od towarów i usług"],
    party: "PODATNIK:",
    details_heading: "DANE DEKLARACJI:",
    details: PERIOD_AND_OFFICE,
    amounts: &[
        ("Podatek należny (zł)", "vatDue"),
        ("Podatek naliczony do odliczenia (zł)", "vatDeductible"),
        ("Kwota do wpłaty (zł)", "vatPayable"),
    ],
    captions: &["(Podpis podatnika lub osoby reprezentującej)"],
};

const VAT_UE: Declaration = Declaration {
    title: &["VAT-UE", "Informacja podsumowująca"],
    party: "PODATNIK:",
    details_heading: "DANE INFORMACJI:",
    details: PERIOD_AND_OFFICE,
    amounts: &[
        ("Wewnątrzwspólnotowe dostawy towarów (zł)", "intraCommunitySupply"),
        ("Wewnątrzwspólnotowe nabycia towarów (zł)", "intraCommunityAcquisition"),
    ],
    captions: &["(Podpis podatnika)"],
};

const VAT_R: Declaration = Declaration {
    title: &["VAT-R", "Zgłoszenie rejestracyjne w zakresie podatku od towarów i usług"],
    party: "PODATNIK:",
    details_heading: "DANE ZGŁOSZENIA:",
    details: &[
        ("Urząd skarbowy", "taxOffice"),
        ("Data rejestracji", "registrationDate"),
        ("Okres rozliczeń (miesięczny/kwartalny)", "settlementPeriod"),
    ],
    amounts: &[],
    captions: &["(Podpis podatnika)"],
};

const CIT8: Declaration = Declaration {
    title: &[
        "CIT-8",
        "Zeznanie o wysokości osiągniętego dochodu",
        "podatnika podatku dochodowego od osób prawnych",
    ],
    party: "PODATNIK:",
    details_heading: "DANE ZEZNANIA:",
    details: YEAR_AND_OFFICE,
    amounts: INCOME_CALCULATION,
    captions: &["(Podpis osoby reprezentującej)", "(Podpis osoby prowadzącej księgi)"],
};

const ZUS_DRA: Declaration = Declaration {
    title: &["ZUS DRA", "Deklaracja rozliczeniowa"],
    party: "PŁATNIK SKŁADEK:",
    details_heading: "DANE DEKLARACJI:",
    details: &[("Okres rozliczeniowy", "period")],
    amounts: &[
        ("Liczba ubezpieczonych", "insuredCount"),
        ("Podstawa wymiaru składek (zł)", "contributionBase"),
        ("Składki na ubezpieczenia społeczne (zł)", "socialContributions"),
        ("Składka na ubezpieczenie zdrowotne (zł)", "healthContribution"),
    ],
    captions: &["(Podpis płatnika składek)"],
};

const ZUS_ZUA: Declaration = Declaration {
    title: &["ZUS ZUA", "Zgłoszenie do ubezpieczeń"],
    party: "OSOBA ZGŁASZANA:",
    details_heading: "DANE ZGŁOSZENIA:",
    details: &[
        ("PESEL", "pesel"),
        ("Kod tytułu ubezpieczenia", "zusCode"),
        ("Data powstania obowiązku ubezpieczeń", "startDate"),
    ],
    amounts: &[],
    captions: &["(Podpis płatnika składek)"],
};

const ZUS_RCA: Declaration = Declaration {
    title: &["ZUS RCA", "Imienny raport miesięczny o należnych składkach"],
    party: "PŁATNIK SKŁADEK:",
    details_heading: "DANE RAPORTU:",
    details: &[
        ("Okres rozliczeniowy", "period"),
        ("Kod tytułu ubezpieczenia", "zusCode"),
    ],
    amounts: ZUS_CONTRIBUTIONS,
    captions: &["(Podpis płatnika składek)"],
};

const JPK_V7M: Declaration = Declaration {
    title: &["JPK_V7M", "Ewidencja i deklaracja VAT (rozliczenie miesięczne)"],
    party: "PODATNIK:",
    details_heading: "DANE PLIKU:",
    details: PERIOD_AND_OFFICE,
    amounts: &[
        ("Liczba wierszy sprzedaży", "salesCount"),
        ("Liczba wierszy zakupów", "purchaseCount"),
        ("Podatek należny (zł)", "vatDue"),
        ("Podatek naliczony (zł)", "vatDeductible"),
    ],
    captions: &["(Podpis podatnika)"],
};

const JPK_FA: Declaration = Declaration {
    title: &["JPK_FA", "Struktura faktur VAT"],
    party: "PODATNIK:",
    details_heading: "DANE PLIKU:",
    details: PERIOD_AND_OFFICE,
    amounts: &[
        ("Liczba faktur", "invoiceCount"),
        ("Wartość brutto faktur (zł)", "grossTotal"),
    ],
    captions: &["(Podpis podatnika)"],
};

const NIP8: Declaration = Declaration {
    title: &["NIP-8", "Zgłoszenie uzupełniające"],
    party: "PODMIOT:",
    details_heading: "DANE ZGŁOSZENIA:",
    details: &[
        ("Urząd skarbowy", "taxOffice"),
        ("Rachunek bankowy", "bankAccount"),
    ],
    amounts: &[],
    captions: &["(Podpis osoby reprezentującej)"],
};

fn pit11(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &PIT11)
}

fn pit4r(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &PIT4R)
}

fn pit28(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &PIT28)
}

fn pit36(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &PIT36)
}

fn pit37(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &PIT37)
}

fn vat7(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &VAT7)
}

fn vat_ue(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &VAT_UE)
}

fn vat_r(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &VAT_R)
}

fn cit8(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &CIT8)
}

fn zus_dra(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &ZUS_DRA)
}

fn zus_zua(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &ZUS_ZUA)
}

fn zus_rca(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &ZUS_RCA)
}

fn jpk_v7m(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &JPK_V7M)
}

fn jpk_fa(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &JPK_FA)
}

fn nip8(ctx: &FormContext<'_>) -> Drawing {
    declaration(ctx, &NIP8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::metadata;
    use crate::forms::model::{Address, Client, Employee};

    fn compose(request: &GenerationRequest) -> Drawing {
        let meta = metadata::lookup(&request.form_type).unwrap();
        let values = request.field_values();
        let ctx = FormContext {
            meta,
            request,
            values: &values,
            issued_on: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
        };
        composer_for(meta.form_type).unwrap()(&ctx)
    }

    fn company_client() -> Client {
        Client {
            company_name: Some("Tech Solutions Sp. z o.o.".into()),
            nip: Some("1234567890".into()),
            regon: Some("123456789".into()),
            address: Some(Address {
                city: Some("Warszawa".into()),
                ..Address::default()
            }),
            ..Client::new("Jan", "Kowalski")
        }
    }

    #[test]
    fn test_pel_matches_paper_layout() {
        let employee = Employee {
            position: Some("Księgowa".into()),
            ..Employee::new("Anna", "Nowak")
        };
        let request = GenerationRequest::new(company_client(), Some(employee), "PEL");
        let drawing = compose(&request);

        let texts: Vec<_> = drawing.texts().collect();
        assert_eq!(texts[0], "PEŁNOMOCNICTWO PEL");
        assert!(texts.contains(&"PŁATNIK SKŁADEK:"));
        assert!(texts.contains(&"Imię i nazwisko: Anna Nowak"));
        assert!(texts.contains(&"Stanowisko: Księgowa"));
        assert!(texts.contains(&"7. Zgłaszania i wyrejestrowywania ubezpieczonych"));
        assert!(texts.contains(&"Data wystawienia: 1.12.2024"));
        assert!(texts.contains(&"(Podpis płatnika składek)"));
        assert!(texts.contains(&"REGON: 123456789"));
    }

    #[test]
    fn test_simple_authorization_uses_basic_identity() {
        let request = GenerationRequest::new(company_client(), None, "PPS-1")
            .with_field("caseDescription", "Zwrot nadpłaty VAT");
        let drawing = compose(&request);

        assert!(drawing.has_line_starting_with("NIP: "));
        assert!(!drawing.has_line_starting_with("REGON"));
        assert!(!drawing.has_line_starting_with("Adres"));
        assert!(drawing.has_line_starting_with("Sprawa: Zwrot nadpłaty VAT"));
        assert!(drawing.has_line_starting_with("Organ podatkowy: ____"));
    }

    #[test]
    fn test_declaration_prints_supplied_amounts_and_blanks() {
        let request = GenerationRequest::new(company_client(), None, "PIT-36")
            .with_field("year", "2024")
            .with_field("revenue", "150000.00");
        let drawing = compose(&request);

        assert!(drawing.has_line_starting_with("Rok podatkowy: 2024"));
        assert!(drawing.has_line_starting_with("Przychód (zł): 150000.00"));
        assert!(drawing.has_line_starting_with("Dochód (zł): ____"));
        assert!(!drawing.has_line_starting_with("Sporządził"));
        assert!(drawing.texts().any(|t| t == "(Podpis małżonka)"));
    }

    #[test]
    fn test_declaration_names_preparer() {
        let request = GenerationRequest::new(
            company_client(),
            Some(Employee::new("Piotr", "Wiśniewski")),
            "VAT-7",
        );
        let drawing = compose(&request);
        assert!(drawing.has_line_starting_with("Sporządził(a): Piotr Wiśniewski"));
    }

    #[test]
    fn test_zua_reads_record_fields() {
        let client = Client {
            pesel: Some("80010112345".into()),
            ..Client::new("Jan", "Kowalski")
        };
        let request = GenerationRequest::new(client, None, "ZUS-ZUA");
        let drawing = compose(&request);
        assert!(drawing.has_line_starting_with("PESEL: 80010112345"));
    }

    #[test]
    fn test_official_type_has_no_composer() {
        assert!(composer_for("UPL-1").is_none());
        assert!(composer_for("FOO-99").is_none());
    }
}
