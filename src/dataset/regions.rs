//! Political-geography classification
//!
//! Two static lookups ride alongside the emissions tables:
//!
//! - a region lookup (loaded from the workbook's region sheet) mapping each
//!   political geography to a world-region bloc, used for coloring and for
//!   the ternary grouping partitions, and
//! - a fixed ISO-3166 alpha-3 table used to place countries on the
//!   choropleth. Geographies without a code (historical entities, fishing
//!   zones) are simply absent from the map layer - that is not an error.

use serde::Serialize;

/// World-region bloc of a political geography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    World,
    Africa,
    AsiaPacific,
    CommonwealthOfIndependentStates,
    MiddleEast,
    NorthAmerica,
    SouthAndCentralAmerica,
    Europe,
    Antarctica,
    AnnexI,
    NonAnnexI,
    None,
}

impl Region {
    /// Parse the region sheet's label column. Unknown labels become
    /// [`Region::None`] rather than an error: the dataset mixes historical
    /// entities into the lookup and the charts just leave them uncolored.
    pub fn parse(label: &str) -> Region {
        match label.trim().to_ascii_uppercase().as_str() {
            "WORLD" => Region::World,
            "AFRICA" => Region::Africa,
            "ASIA PACIFIC" => Region::AsiaPacific,
            "COMMONWEALTH OF INDEPENDENT STATES" => Region::CommonwealthOfIndependentStates,
            "MIDDLE EAST" => Region::MiddleEast,
            "NORTH AMERICA" => Region::NorthAmerica,
            "SOUTH AND CENTRAL AMERICA" => Region::SouthAndCentralAmerica,
            "EUROPE" => Region::Europe,
            "ANTARCTICA" => Region::Antarctica,
            "ANNEX I" => Region::AnnexI,
            "NON-ANNEX I" => Region::NonAnnexI,
            _ => Region::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Region::World => "WORLD",
            Region::Africa => "AFRICA",
            Region::AsiaPacific => "ASIA PACIFIC",
            Region::CommonwealthOfIndependentStates => "COMMONWEALTH OF INDEPENDENT STATES",
            Region::MiddleEast => "MIDDLE EAST",
            Region::NorthAmerica => "NORTH AMERICA",
            Region::SouthAndCentralAmerica => "SOUTH AND CENTRAL AMERICA",
            Region::Europe => "EUROPE",
            Region::Antarctica => "ANTARCTICA",
            Region::AnnexI => "ANNEX I",
            Region::NonAnnexI => "NON-ANNEX I",
            Region::None => "NONE",
        }
    }
}

/// The seven BP world-region aggregate rows.
pub const BP_REGIONS: &[&str] = &[
    "AFRICA",
    "ASIA PACIFIC",
    "COMMONWEALTH OF INDEPENDENT STATES",
    "MIDDLE EAST",
    "NORTH AMERICA",
    "SOUTH AND CENTRAL AMERICA",
    "EUROPE",
];

/// UNFCCC party-type aggregate rows.
pub const ANNEX_GEOGRAPHIES: &[&str] = &["ANNEX I", "NON-ANNEX I"];

/// The single global aggregate row.
pub const WORLD: &str = "WORLD";

/// Every aggregate row that must be excluded from per-country views.
pub const AGGREGATE_GEOGRAPHIES: &[&str] = &[
    "AFRICA",
    "ANTARCTICA",
    "ASIA PACIFIC",
    "COMMONWEALTH OF INDEPENDENT STATES",
    "EUROPE",
    "MIDDLE EAST",
    "NORTH AMERICA",
    "SOUTH AND CENTRAL AMERICA",
    "ANNEX I",
    "NON-ANNEX I",
    "WORLD",
];

pub fn is_aggregate(geography: &str) -> bool {
    AGGREGATE_GEOGRAPHIES.contains(&geography)
}

/// Geography -> region bloc lookup, loaded once and immutable.
#[derive(Debug, Clone, Default)]
pub struct RegionLookup {
    entries: std::collections::HashMap<String, Region>,
}

impl RegionLookup {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Region)>,
        S: Into<String>,
    {
        RegionLookup {
            entries: pairs.into_iter().map(|(g, r)| (g.into(), r)).collect(),
        }
    }

    pub fn region_of(&self, geography: &str) -> Region {
        self.entries
            .get(geography)
            .copied()
            .unwrap_or(Region::None)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// ISO-3166 alpha-3 code for the choropleth layer, or `None` for
/// geographies the map cannot place (historical entities, aggregates).
pub fn iso3(geography: &str) -> Option<&'static str> {
    ISO3_CODES
        .iter()
        .find(|(name, _)| *name == geography)
        .map(|(_, code)| *code)
}

// Dataset spelling -> ISO-3166 alpha-3. Historical entities map to their
// successor state's code where the ISO registry does the same.
const ISO3_CODES: &[(&str, &str)] = &[
    ("AFGHANISTAN", "AFG"),
    ("ALBANIA", "ALB"),
    ("ALGERIA", "DZA"),
    ("AMERICAN SAMOA", "ASM"),
    ("ANDORRA", "AND"),
    ("ANGOLA", "AGO"),
    ("ANTIGUA & BARBUDA", "ATG"),
    ("AZERBAIJAN", "AZE"),
    ("ARGENTINA", "ARG"),
    ("AUSTRALIA", "AUS"),
    ("AUSTRIA", "AUT"),
    ("BAHAMAS", "BHS"),
    ("BAHRAIN", "BHR"),
    ("BANGLADESH", "BGD"),
    ("ARMENIA", "ARM"),
    ("BARBADOS", "BRB"),
    ("BELGIUM", "BEL"),
    ("BERMUDA", "BMU"),
    ("BHUTAN", "BTN"),
    ("PLURINATIONAL STATE OF BOLIVIA", "BOL"),
    ("BOSNIA & HERZEGOVINA", "BIH"),
    ("BOTSWANA", "BWA"),
    ("BRAZIL", "BRA"),
    ("BELIZE", "BLZ"),
    ("BRITISH INDIAN OCEAN TERRITORIES", "IOT"),
    ("SOLOMON ISLANDS", "SLB"),
    ("BRITISH VIRGIN ISLANDS", "VGB"),
    ("BRUNEI (DARUSSALAM)", "BRN"),
    ("BULGARIA", "BGR"),
    ("MYANMAR (FORMERLY BURMA)", "MMR"),
    ("BURUNDI", "BDI"),
    ("BELARUS", "BLR"),
    ("CAMBODIA", "KHM"),
    ("REPUBLIC OF CAMEROON", "CMR"),
    ("CANADA", "CAN"),
    ("CAPE VERDE", "CPV"),
    ("CAYMAN ISLANDS", "CYM"),
    ("CENTRAL AFRICAN REPUBLIC", "CAF"),
    ("SRI LANKA", "LKA"),
    ("CHAD", "TCD"),
    ("CHILE", "CHL"),
    ("CHINA (MAINLAND)", "CHN"),
    ("TAIWAN", "TWN"),
    ("CHRISTMAS ISLAND", "CXR"),
    ("COLOMBIA", "COL"),
    ("COMOROS", "COM"),
    ("MAYOTTE", "MYT"),
    ("CONGO", "COG"),
    ("DEMOCRATIC REPUBLIC OF THE CONGO (FORMERLY ZAIRE)", "COD"),
    ("COOK ISLANDS", "COK"),
    ("COSTA RICA", "CRI"),
    ("CROATIA", "HRV"),
    ("CUBA", "CUB"),
    ("CYPRUS", "CYP"),
    ("CZECHOSLOVAKIA", "CZE"),
    ("CZECH REPUBLIC", "CZE"),
    ("BENIN", "BEN"),
    ("DENMARK", "DNK"),
    ("DOMINICA", "DMA"),
    ("DOMINICAN REPUBLIC", "DOM"),
    ("ECUADOR", "ECU"),
    ("EL SALVADOR", "SLV"),
    ("EQUATORIAL GUINEA", "GNQ"),
    ("ETHIOPIA", "ETH"),
    ("ERITREA", "ERI"),
    ("ESTONIA", "EST"),
    ("FAEROE ISLANDS", "FRO"),
    ("FALKLAND ISLANDS (MALVINAS)", "FLK"),
    ("FIJI", "FJI"),
    ("FINLAND", "FIN"),
    ("ALAND ISLANDS", "ALA"),
    ("FRANCE", "FRA"),
    ("FRANCE (INCLUDING MONACO)", "FRA"),
    ("FRENCH GUIANA", "GUF"),
    ("FRENCH POLYNESIA", "PYF"),
    ("DJIBOUTI", "DJI"),
    ("FRENCH EQUATORIAL AFRICA", "ATF"),
    ("FRENCH INDO-CHINA", "ATF"),
    ("GABON", "GAB"),
    ("FRENCH WEST AFRICA", "ATF"),
    ("GEORGIA", "GEO"),
    ("GAMBIA", "GMB"),
    ("OCCUPIED PALESTINIAN TERRITORY", "PSE"),
    ("GERMANY", "DEU"),
    ("FORMER GERMAN DEMOCRATIC REPUBLIC", "DEU"),
    ("FEDERAL REPUBLIC OF GERMANY", "DEU"),
    ("GHANA", "GHA"),
    ("GIBRALTAR", "GIB"),
    ("KIRIBATI", "KIR"),
    ("GREECE", "GRC"),
    ("GREENLAND", "GRL"),
    ("GRENADA", "GRD"),
    ("GUADELOUPE", "GLP"),
    ("GUAM", "GUM"),
    ("GUATEMALA", "GTM"),
    ("GUINEA", "GIN"),
    ("GUYANA", "GUY"),
    ("HAITI", "HTI"),
    ("HONDURAS", "HND"),
    ("HONG KONG SPECIAL ADMINSTRATIVE REGION OF CHINA", "HKG"),
    ("HUNGARY", "HUN"),
    ("ICELAND", "ISL"),
    ("INDIA", "IND"),
    ("INDONESIA", "IDN"),
    ("ISLAMIC REPUBLIC OF IRAN", "IRN"),
    ("IRAQ", "IRQ"),
    ("IRELAND", "IRL"),
    ("ISRAEL", "ISR"),
    ("ITALY", "ITA"),
    ("ITALY (INCLUDING SAN MARINO)", "ITA"),
    ("COTE D IVOIRE", "CIV"),
    ("JAMAICA", "JAM"),
    ("JAPAN", "JPN"),
    ("JAPAN (INCLUDING OKINAWA)", "JPN"),
    ("KAZAKHSTAN", "KAZ"),
    ("JORDAN", "JOR"),
    ("KENYA", "KEN"),
    ("KOREA, NORTH", "PRK"),
    ("KOREA, SOUTH", "KOR"),
    ("KUWAIT", "KWT"),
    ("KYRGYZSTAN", "KGZ"),
    ("LAO PEOPLE S DEMOCRATIC REPUBLIC", "LAO"),
    ("LEBANON", "LBN"),
    ("LESOTHO", "LSO"),
    ("LATVIA", "LVA"),
    ("LIBERIA", "LBR"),
    ("LIBYAN ARAB JAMAHIRIYA", "LBY"),
    ("LIECHTENSTEIN", "LIE"),
    ("LITHUANIA", "LTU"),
    ("LUXEMBOURG", "LUX"),
    ("MACAO", "MAC"),
    ("MADAGASCAR", "MDG"),
    ("MALAWI", "MWI"),
    ("MALAYSIA", "MYS"),
    ("MALDIVES", "MDV"),
    ("MALI", "MLI"),
    ("MALTA", "MLT"),
    ("MARTINIQUE", "MTQ"),
    ("MAURITANIA", "MRT"),
    ("MAURITIUS", "MUS"),
    ("MEXICO", "MEX"),
    ("MOLDOVA", "MDA"),
    ("MONACO", "MCO"),
    ("MONGOLIA", "MNG"),
    ("MONTENEGRO", "MNE"),
    ("MOROCCO", "MAR"),
    ("MOZAMBIQUE", "MOZ"),
    ("OMAN", "OMN"),
    ("NAMIBIA", "NAM"),
    ("NAURU", "NRU"),
    ("NEPAL", "NPL"),
    ("NETHERLANDS", "NLD"),
    ("NETHERLANDS ANTILLES", "ANT"),
    ("ARUBA", "ABW"),
    ("NEW CALEDONIA", "NCL"),
    ("VANUATU", "VUT"),
    ("NEW ZEALAND", "NZL"),
    ("NICARAGUA", "NIC"),
    ("NIGER", "NER"),
    ("NIGERIA", "NGA"),
    ("NIUE", "NIU"),
    ("NORTHERN MARIANA ISLANDS", "MNP"),
    ("NORWAY", "NOR"),
    ("FORMER YUGOSLAV REPUBLIC OF MACEDONIA", "MKD"),
    ("THE FORMER YUGOSLAV REPUBLIC OF MACEDONIA", "MKD"),
    ("MALAYA", "MYS"),
    ("MICRONESIA, FEDERATED STATES OF", "FSM"),
    ("MARIANA ISLANDS", "MNP"),
    ("PAKISTAN", "PAK"),
    ("PALAU", "PLW"),
    ("PANAMA", "PAN"),
    ("PAPUA NEW GUINEA", "PNG"),
    ("PARAGUAY", "PRY"),
    ("PERU", "PER"),
    ("PHILIPPINES", "PHL"),
    ("PITCAIRN", "PCN"),
    ("POLAND", "POL"),
    ("PORTUGAL", "PRT"),
    ("GUINEA-BISSAU", "GNB"),
    ("TIMOR-LESTE", "TLS"),
    ("PUERTO RICO", "PRI"),
    ("QATAR", "QAT"),
    ("REUNION", "REU"),
    ("ROMANIA", "ROU"),
    ("RUSSIAN FEDERATION", "RUS"),
    ("RWANDA", "RWA"),
    ("SAINT HELENA", "SHN"),
    ("SAINT KITTS & NEVIS", "KNA"),
    ("ANGUILLA", "AIA"),
    ("SAINT LUCIA", "LCA"),
    ("SAINT PIERRE & MIQUELON", "SPM"),
    ("SAINT VINCENT & THE GRENADINES", "VCT"),
    ("SAN MARINO", "SMR"),
    ("SAO TOME & PRINCIPE", "STP"),
    ("SAUDI ARABIA", "SAU"),
    ("SENEGAL", "SEN"),
    ("SERBIA", "SRB"),
    ("SEYCHELLES", "SYC"),
    ("SIERRA LEONE", "SLE"),
    ("SINGAPORE", "SGP"),
    ("SLOVAKIA", "SVK"),
    ("VIET NAM", "VNM"),
    ("SLOVENIA", "SVN"),
    ("SOMALIA", "SOM"),
    ("REPUBLIC OF YEMEN", "YEM"),
    ("SOUTH AFRICA", "ZAF"),
    ("ZIMBABWE", "ZWE"),
    ("SPAIN", "ESP"),
    ("SPANISH NORTH AFRICA", "ESP"),
    ("WESTERN SAHARA", "ESH"),
    ("SUDAN", "SDN"),
    ("SURINAME", "SUR"),
    ("SWAZILAND", "SWZ"),
    ("SWEDEN", "SWE"),
    ("SWITZERLAND", "CHE"),
    ("SYRIAN ARAB REPUBLIC", "SYR"),
    ("TAJIKISTAN", "TJK"),
    ("THAILAND", "THA"),
    ("TOGO", "TGO"),
    ("TONGA", "TON"),
    ("TRINIDAD & TOBAGO", "TTO"),
    ("UNITED ARAB EMIRATES", "ARE"),
    ("TUNISIA", "TUN"),
    ("TURKEY", "TUR"),
    ("TURKMENISTAN", "TKM"),
    ("TURKS & CAICOS ISLANDS", "TCA"),
    ("TUVALU", "TUV"),
    ("UGANDA", "UGA"),
    ("UKRAINE", "UKR"),
    ("SOVIET UNION", "SUN"),
    ("EGYPT", "EGY"),
    ("UNITED KINGDOM", "GBR"),
    ("GUERNSEY", "GGY"),
    ("JERSEY", "JEY"),
    ("ISLE OF MAN", "IMN"),
    ("TANZANIA", "TZA"),
    ("UNITED STATES OF AMERICA", "USA"),
    ("VIRGIN ISLANDS OF THE UNITED STATES", "VIR"),
    ("BURKINA FASO", "BFA"),
    ("URUGUAY", "URY"),
    ("UZBEKISTAN", "UZB"),
    ("VATICAN CITY", "VAT"),
    ("VENEZUELA", "VEN"),
    ("WALLIS & FUTUNA ISLANDS", "WLF"),
    ("SAMOA", "WSM"),
    ("YEMEN", "YEM"),
    ("SERBIA & MONTENEGRO", "SCG"),
    ("ZAMBIA", "ZMB"),
    ("ZANZIBAR", "TZA"),
];

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // REGION CLASSIFICATION TESTS
    // ==========================================================================

    #[test]
    fn aggregate_rows_are_recognized() {
        assert!(is_aggregate("WORLD"));
        assert!(is_aggregate("ANNEX I"));
        assert!(is_aggregate("EUROPE"));
        assert!(!is_aggregate("UNITED STATES OF AMERICA"));
    }

    #[test]
    fn bp_regions_annex_and_world_partition_the_aggregates() {
        // Every aggregate row is exactly one of: BP region, annex bloc,
        // world, or Antarctica. The ternary partitions rely on this.
        for geo in AGGREGATE_GEOGRAPHIES {
            let memberships = [
                BP_REGIONS.contains(geo),
                ANNEX_GEOGRAPHIES.contains(geo),
                *geo == WORLD,
                *geo == "ANTARCTICA",
            ];
            assert_eq!(
                memberships.iter().filter(|m| **m).count(),
                1,
                "{:?} must belong to exactly one aggregate class",
                geo
            );
        }
    }

    #[test]
    fn region_parse_round_trips_labels() {
        for label in AGGREGATE_GEOGRAPHIES {
            let region = Region::parse(label);
            assert_ne!(region, Region::None, "{:?} must parse", label);
            assert_eq!(region.label(), *label);
        }
        assert_eq!(Region::parse("RHODESIA-NYASALAND"), Region::None);
    }

    #[test]
    fn lookup_defaults_to_none() {
        let lookup = RegionLookup::from_pairs([("FRANCE", Region::Europe)]);
        assert_eq!(lookup.region_of("FRANCE"), Region::Europe);
        assert_eq!(lookup.region_of("ATLANTIS"), Region::None);
    }

    #[test]
    fn iso3_maps_countries_and_skips_unmappable_geographies() {
        assert_eq!(iso3("UNITED STATES OF AMERICA"), Some("USA"));
        assert_eq!(iso3("FRANCE (INCLUDING MONACO)"), Some("FRA"));
        assert_eq!(iso3("WORLD"), None);
        assert_eq!(iso3("ANTARCTIC FISHERIES"), None);
    }

    #[test]
    fn iso3_table_has_no_duplicate_names() {
        let mut seen = std::collections::HashSet::new();
        for (name, _) in ISO3_CODES {
            assert!(seen.insert(name), "duplicate ISO entry {:?}", name);
        }
    }
}
