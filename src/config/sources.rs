// * Predefined source catalogue, grouped by entity kind

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PredefinedSource {
    pub kind: &'static str,
    pub name: &'static str,
    pub url: &'static str,
    pub description: &'static str,
    /// The page only renders its listing with JavaScript
    pub requires_rendering: bool,
}

pub const PREDEFINED_SOURCES: &[PredefinedSource] = &[
    PredefinedSource {
        kind: "hospital",
        name: "NABH Accredited Hospitals",
        url: "https://nabh.co/hospitals-accredited-list/",
        description: "National Accreditation Board for Hospitals & Healthcare Providers",
        requires_rendering: false,
    },
    PredefinedSource {
        kind: "hospital",
        name: "JCI Accredited Organizations",
        url: "https://www.jci.org/accredited-organizations",
        description: "Joint Commission International",
        requires_rendering: true,
    },
    PredefinedSource {
        kind: "hospital",
        name: "Quality Check Hospitals",
        url: "https://www.qualitycheck.org/find-a-hospital/",
        description: "The Joint Commission Quality Check",
        requires_rendering: true,
    },
    PredefinedSource {
        kind: "insurance",
        name: "IRDAI",
        url: "https://www.irdai.gov.in/",
        description: "Insurance Regulatory and Development Authority of India",
        requires_rendering: false,
    },
    PredefinedSource {
        kind: "insurance",
        name: "PolicyBazaar",
        url: "https://www.policybazaar.com/",
        description: "Insurance comparison platform",
        requires_rendering: true,
    },
    PredefinedSource {
        kind: "bank",
        name: "RBI",
        url: "https://rbi.org.in/",
        description: "Reserve Bank of India",
        requires_rendering: false,
    },
    PredefinedSource {
        kind: "bank",
        name: "BankBazaar",
        url: "https://www.bankbazaar.com/",
        description: "Banking and financial services",
        requires_rendering: true,
    },
    PredefinedSource {
        kind: "school",
        name: "CBSE Schools",
        url: "https://cbse.gov.in/",
        description: "Central Board of Secondary Education",
        requires_rendering: false,
    },
    PredefinedSource {
        kind: "pharmacy",
        name: "CDSCO",
        url: "https://cdsco.gov.in/",
        description: "Central Drugs Standard Control Organization",
        requires_rendering: false,
    },
];

/// Sources for one kind (case-insensitive), or all of them when `kind` is None
pub fn sources_for(kind: Option<&str>) -> Vec<&'static PredefinedSource> {
    PREDEFINED_SOURCES
        .iter()
        .filter(|s| kind.map_or(true, |k| s.kind.eq_ignore_ascii_case(k)))
        .collect()
}
