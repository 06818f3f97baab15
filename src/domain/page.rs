use std::fmt;

/// Category of competitor page the extractor looks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageType {
    ServicesListing,
    Team,
    DoctorProfiles,
    About,
    Contact,
    /// Any other name; only usable together with a custom pattern.
    Other(String),
}

impl PageType {
    pub fn as_str(&self) -> &str {
        match self {
            PageType::ServicesListing => "services_listing",
            PageType::Team => "team",
            PageType::DoctorProfiles => "doctor_profiles",
            PageType::About => "about",
            PageType::Contact => "contact",
            PageType::Other(name) => name,
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value.trim() {
            "services_listing" => PageType::ServicesListing,
            "team" => PageType::Team,
            "doctor_profiles" => PageType::DoctorProfiles,
            "about" => PageType::About,
            "contact" => PageType::Contact,
            other => PageType::Other(other.to_string()),
        }
    }

    pub fn is_services_listing(&self) -> bool {
        matches!(self, PageType::ServicesListing)
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
