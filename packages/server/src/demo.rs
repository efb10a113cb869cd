//! Sample data served when `HSO_DEMO=1`.

use hso_database::MemoryBackend;
use hso_database_models::{AccountRow, Announcement, AnnouncementColor, Program};
use hso_incident_models::{IncidentRecord, Office};

/// `(status, month, office, name, location, description)`
const INCIDENTS: [(&str, u32, Office, &str, &str, &str); 8] = [
    (
        "Resolved",
        1,
        Office::GeneralServicesDepartment,
        "Marco Reyes",
        "Building A, 2nd floor",
        "Broken handrail on the east stairwell",
    ),
    (
        "Resolved",
        2,
        Office::MedicalDentalServices,
        "Lena Cruz",
        "Gymnasium",
        "Student sprained an ankle during PE class",
    ),
    (
        "Ongoing",
        3,
        Office::GeneralServicesDepartment,
        "Paolo Santos",
        "Library",
        "Water leak from the ceiling near the reading area",
    ),
    (
        "Resolved",
        3,
        Office::GeneralServicesDepartment,
        "Ana Lim",
        "Parking lot B",
        "Flickering lamp post",
    ),
    (
        "Ongoing",
        4,
        Office::MedicalDentalServices,
        "Jun Dela Rosa",
        "Cafeteria",
        "Several students reported stomach pain after lunch",
    ),
    (
        "Open",
        4,
        Office::HealthAndSafetyOffice,
        "Mia Tan",
        "Chemistry laboratory",
        "Fume hood alarm keeps going off",
    ),
    (
        "Open",
        5,
        Office::HealthAndSafetyOffice,
        "Carlo Bautista",
        "Main gate",
        "Loose tiles on the walkway",
    ),
    (
        "Open",
        5,
        Office::HealthAndSafetyOffice,
        "Rina Garcia",
        "Building C restroom",
        "Slippery floor with no warning sign",
    ),
];

fn incidents(year: i32) -> Vec<IncidentRecord> {
    INCIDENTS
        .iter()
        .zip(1_i64..)
        .map(|(&(status, month, office, name, location, description), id)| {
            let mut record =
                IncidentRecord::new(id, status, &format!("{year}-{month:02}-10T09:30:00+00:00"));
            record.office = Some(office.to_string());
            record.name = Some(name.to_string());
            record.location = Some(location.to_string());
            record.description = Some(description.to_string());
            if status == "Resolved" {
                record.action_taken = Some("Inspected and fixed on site".to_string());
            }
            record
        })
        .collect()
}

fn announcements(year: i32) -> Vec<Announcement> {
    [
        (
            AnnouncementColor::Red,
            "Fire drill",
            "Campus-wide fire drill on Friday at 10 AM. Follow the posted evacuation routes.",
        ),
        (
            AnnouncementColor::Yellow,
            "Wet floors",
            "The lobby of Building B is being cleaned. Use the side entrance.",
        ),
        (
            AnnouncementColor::Green,
            "Clinic hours",
            "Medical and Dental Services is open 8 AM to 5 PM on weekdays.",
        ),
    ]
    .into_iter()
    .zip(1_u32..)
    .map(|((color, title, content), n)| Announcement {
        id: n.to_string(),
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        created_by: Some("Health and Safety Office".to_string()),
        color: Some(color.to_string()),
        images: None,
        created_at: Some(format!("{year}-0{n}-01T08:00:00+00:00")),
    })
    .collect()
}

fn programs(year: i32) -> Vec<Program> {
    [
        (
            "First aid training",
            "Hands-on basic life support and first aid",
            "Student leaders and staff",
        ),
        (
            "Mental health week",
            "Talks and open counseling sessions",
            "Everyone on campus",
        ),
    ]
    .into_iter()
    .zip(1_u32..)
    .map(|((title, what, who), n)| Program {
        id: n.to_string(),
        title: Some(title.to_string()),
        what: Some(what.to_string()),
        who: Some(who.to_string()),
        images: None,
        created_at: Some(format!("{year}-0{n}-15T08:00:00+00:00")),
    })
    .collect()
}

fn accounts() -> Vec<AccountRow> {
    ["student", "student", "student", "staff", "admin"]
        .into_iter()
        .map(|user_type| AccountRow {
            user_type: Some(user_type.to_string()),
        })
        .collect()
}

/// Builds an in-memory backend holding a small campus's worth of incidents,
/// announcements, programs, and accounts, all dated within `year`.
#[must_use]
pub fn demo_backend(year: i32) -> MemoryBackend {
    MemoryBackend::new()
        .with_incidents(incidents(year))
        .with_announcements(announcements(year))
        .with_programs(programs(year))
        .with_accounts(accounts())
}
