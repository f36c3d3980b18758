/// Catalog landing page listing every "Statistics on Alcohol" publication
pub const SOURCE_URL: &str =
    "https://digital.nhs.uk/data-and-information/publications/statistical/statistics-on-alcohol";

/// Directory all output artifacts are written under
pub const OUT_DIR: &str = "out";

/// Base URI the CSVW schema descriptors are keyed to
pub const SCHEMA_BASE_URI: &str = "https://ons-opendata.github.io/ref_alcohol/";

/// Dataset identifiers are `<DATASET_PREFIX>/<table slug>`
pub const DATASET_PREFIX: &str = "gss_data/health/nhs-statistics-on-alcohol-england";

pub const DATASET_FAMILY: &str = "health";

pub const DATASET_THEME: &str = "health-social-care";

/// Root of the graph, data and definition URIs in the metadata documents
pub const GSS_BASE_URI: &str = "http://gss-data.org.uk/";

pub const PUBLISHER_URI: &str = "https://www.gov.uk/government/organisations/nhs-digital";
