//! Static reference data: departments, their tasks, and zones.
//!
//! The core only reads the catalog to validate ids and to resolve display
//! labels. It never mutates it.

use serde::{Deserialize, Serialize};

/// Display language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (left-to-right)
    #[default]
    En,
    /// Arabic (right-to-left)
    Ar,
}

impl Language {
    /// Language code as stored by the settings collaborator.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown language code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language: {0}")]
pub struct UnknownLanguage(pub String);

impl std::str::FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// One selectable catalog item (department, task or zone).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Stable id
    pub id: String,

    /// English label
    pub label_en: String,

    /// Arabic label
    pub label_ar: String,

    /// Icon key used by the presentation layer
    pub icon: String,
}

impl CatalogEntry {
    /// Create an entry.
    pub fn new(id: &str, label_en: &str, label_ar: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            label_en: label_en.to_string(),
            label_ar: label_ar.to_string(),
            icon: icon.to_string(),
        }
    }

    /// Label in `lang`, falling back to the other language when empty.
    pub fn label(&self, lang: Language) -> &str {
        let (primary, fallback) = match lang {
            Language::En => (&self.label_en, &self.label_ar),
            Language::Ar => (&self.label_ar, &self.label_en),
        };
        if primary.is_empty() {
            fallback
        } else {
            primary
        }
    }
}

/// A department and the tasks it offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// The department itself
    #[serde(flatten)]
    pub entry: CatalogEntry,

    /// Tasks that can be performed in this department
    pub tasks: Vec<CatalogEntry>,
}

/// The full reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Departments, in display order
    pub departments: Vec<Department>,

    /// Zones, in display order
    pub zones: Vec<CatalogEntry>,
}

impl Catalog {
    /// Look up a department by id.
    pub fn department(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.entry.id == id)
    }

    /// Tasks for a department; empty when the department is unknown.
    pub fn tasks_for(&self, department_id: &str) -> &[CatalogEntry] {
        self.department(department_id)
            .map(|d| d.tasks.as_slice())
            .unwrap_or(&[])
    }

    /// Look up a task within a department.
    pub fn task(&self, department_id: &str, task_id: &str) -> Option<&CatalogEntry> {
        self.tasks_for(department_id).iter().find(|t| t.id == task_id)
    }

    /// Look up a zone by id.
    pub fn zone(&self, id: &str) -> Option<&CatalogEntry> {
        self.zones.iter().find(|z| z.id == id)
    }

    /// Remove a zone (used when the reference data is edited elsewhere).
    pub fn without_zone(mut self, id: &str) -> Self {
        self.zones.retain(|z| z.id != id);
        self
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let task = |id: &str, en: &str, ar: &str| CatalogEntry::new(id, en, ar, "list-bullet");
        let zone = |id: &str, en: &str, ar: &str| CatalogEntry::new(id, en, ar, "squares-2x2");

        Self {
            departments: vec![
                Department {
                    entry: CatalogEntry::new("farming", "Farming", "زراعة", "sun"),
                    tasks: vec![
                        task("harvest", "Harvest", "حصاد"),
                        task("irrigation", "Irrigation", "ري"),
                        task("cleaning", "Cleaning", "تنظيف"),
                        task("planting_seeds", "Planting Seeds", "متابعة النبات"),
                    ],
                },
                Department {
                    entry: CatalogEntry::new("maintenance", "Maintenance", "صيانة", "wrench-simple"),
                    tasks: vec![
                        task("watering", "Watering", "ري"),
                        task("fixing_installations", "Fixing Installations", "إصلاح المنشآت"),
                        task("internal_transport", "Internal Transport", "نقل داخلي"),
                        task("harvest_maintenance", "Harvest (maintenance)", "حصاد (صيانة)"),
                    ],
                },
                Department {
                    entry: CatalogEntry::new("quality", "Quality", "الجودة", "check-circle"),
                    tasks: vec![
                        task("actions", "Actions", "أعطال"),
                        task("equipment_maintenance", "Equipment Maintenance", "صيانة معدات"),
                        task("cleaning_cooling", "Cleaning & Cooling", "أنظمة ري، تبريد"),
                        task("notes", "Notes", "ملاحظات"),
                    ],
                },
                Department {
                    entry: CatalogEntry::new("storage", "Storage", "التخزين", "cube"),
                    tasks: vec![
                        task("quality_check", "Quality Check", "فحص جودة"),
                        task("quality_notes", "Quality Notes", "ملاحظات جودة"),
                        task("record_issues", "Record Issues for Production", "تسجيل مشاكل إنتاج"),
                    ],
                },
            ],
            zones: vec![
                zone("a", "A", "أ"),
                zone("b", "B", "ب"),
                zone("c", "C", "ج"),
                zone("d", "D", "د"),
                CatalogEntry::new("inventory", "Inventory", "المخزون", "cube"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_lookups() {
        let catalog = Catalog::default();
        assert_eq!(catalog.departments.len(), 4);
        assert_eq!(catalog.tasks_for("farming").len(), 4);
        assert_eq!(catalog.tasks_for("storage").len(), 3);
        assert!(catalog.task("farming", "harvest").is_some());
        assert!(catalog.task("maintenance", "harvest").is_none());
        assert_eq!(catalog.zone("inventory").map(|z| z.label_en.as_str()), Some("Inventory"));
        assert!(catalog.tasks_for("unknown").is_empty());
    }

    #[test]
    fn test_label_by_language() {
        let catalog = Catalog::default();
        let farming = &catalog.department("farming").unwrap().entry;
        assert_eq!(farming.label(Language::En), "Farming");
        assert_eq!(farming.label(Language::Ar), "زراعة");

        let bare = CatalogEntry::new("x", "Only English", "", "cube");
        assert_eq!(bare.label(Language::Ar), "Only English");
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("AR".parse::<Language>(), Ok(Language::Ar));
        assert_eq!(" en ".parse::<Language>(), Ok(Language::En));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_without_zone() {
        let catalog = Catalog::default().without_zone("b");
        assert!(catalog.zone("b").is_none());
        assert!(catalog.zone("a").is_some());
    }
}
