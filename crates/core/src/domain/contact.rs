use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub location: String,
}

struct StaticContact {
    name: &'static str,
    phone: &'static str,
    email: &'static str,
    location: &'static str,
}

const DIRECTORY: [StaticContact; 5] = [
    StaticContact {
        name: "יוסי כהן",
        phone: "050-1234567",
        email: "yossi.cohen@example.com",
        location: "תל אביב",
    },
    StaticContact {
        name: "שרה לוי",
        phone: "052-9876543",
        email: "sarah.levi@example.com",
        location: "חיפה",
    },
    StaticContact {
        name: "דוד רוזן",
        phone: "054-5555555",
        email: "david.rosen@example.com",
        location: "ירושלים",
    },
    StaticContact {
        name: "מיכל אברהם",
        phone: "053-7777777",
        email: "michal.avraham@example.com",
        location: "באר שבע",
    },
    StaticContact {
        name: "אבי גולדברג",
        phone: "050-9999999",
        email: "avi.goldberg@example.com",
        location: "נתניה",
    },
];

/// The fixed seller directory attached to matches.
pub fn contact_directory() -> Vec<ContactEntry> {
    DIRECTORY
        .iter()
        .map(|entry| ContactEntry {
            name: entry.name.to_string(),
            phone: entry.phone.to_string(),
            email: entry.email.to_string(),
            location: entry.location.to_string(),
        })
        .collect()
}
