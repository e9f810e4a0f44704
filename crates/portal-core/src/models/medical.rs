//! Medical-history intake models.
//!
//! One document per pet. Later saves fully overwrite the document, except
//! `completed_at`, which is set once and preserved on resave.

use serde::{Deserialize, Serialize};

/// A current or past medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    /// Dose as written by the client (e.g., "50mg twice daily")
    pub dosage: String,
    pub frequency: String,
    pub reason: Option<String>,
}

/// Allergy severity as reported at intake.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AllergySeverity {
    Mild,
    Moderate,
    Severe,
}

/// A known allergy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Allergy {
    pub allergen: String,
    pub reaction: String,
    pub severity: AllergySeverity,
}

/// A prior surgery or procedure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Surgery {
    pub procedure: String,
    pub date: String,
    pub notes: Option<String>,
}

/// A vaccination on record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vaccination {
    pub vaccine: String,
    pub date: String,
    pub expires: Option<String>,
}

/// A past or ongoing illness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Illness {
    pub condition: String,
    pub diagnosed: String,
    pub resolved: bool,
    pub notes: Option<String>,
}

/// Diet details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DietInfo {
    pub food_type: String,
    pub frequency: String,
    pub notes: Option<String>,
}

/// Exercise and lifestyle details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseInfo {
    /// e.g., "low", "moderate", "high"
    pub activity_level: String,
    pub routine: Option<String>,
}

/// Previous veterinary practice, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviousVet {
    pub clinic_name: String,
    pub vet_name: Option<String>,
    pub phone: Option<String>,
    pub reason_for_leaving: Option<String>,
}

/// Pet insurance details, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceInfo {
    pub provider: String,
    pub policy_number: String,
    pub coverage_notes: Option<String>,
}

/// Who to call when the owner is unreachable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: Option<String>,
    pub phone: String,
}

/// Structured intake record for a pet's prior health and care history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    pub pet_id: String,
    pub client_id: String,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<Allergy>,
    #[serde(default)]
    pub surgeries: Vec<Surgery>,
    #[serde(default)]
    pub vaccinations: Vec<Vaccination>,
    #[serde(default)]
    pub illnesses: Vec<Illness>,
    pub diet: DietInfo,
    pub exercise: ExerciseInfo,
    pub previous_vet: Option<PreviousVet>,
    pub insurance: Option<InsuranceInfo>,
    pub emergency_contact: EmergencyContact,
    pub additional_notes: Option<String>,
    /// Set on first save and preserved by later saves
    pub completed_at: Option<String>,
}

impl MedicalHistory {
    /// Minimal valid history with empty lists and placeholder-free
    /// required sections.
    pub fn new(pet_id: String, client_id: String, emergency_contact: EmergencyContact) -> Self {
        Self {
            pet_id,
            client_id,
            medications: Vec::new(),
            chronic_conditions: Vec::new(),
            allergies: Vec::new(),
            surgeries: Vec::new(),
            vaccinations: Vec::new(),
            illnesses: Vec::new(),
            diet: DietInfo {
                food_type: String::new(),
                frequency: String::new(),
                notes: None,
            },
            exercise: ExerciseInfo {
                activity_level: String::new(),
                routine: None,
            },
            previous_vet: None,
            insurance: None,
            emergency_contact,
            additional_notes: None,
            completed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_tolerate_sparse_payloads() {
        // Clients submit the intake form section by section; missing arrays
        // deserialize as empty rather than failing the whole document.
        let json = r#"{
            "petId": "p1",
            "clientId": "c1",
            "diet": {"foodType": "kibble", "frequency": "2x daily"},
            "exercise": {"activityLevel": "moderate"},
            "emergencyContact": {"name": "Sam", "phone": "555-0100"},
            "previousVet": null,
            "insurance": null,
            "additionalNotes": null,
            "completedAt": null
        }"#;

        let history: MedicalHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.pet_id, "p1");
        assert!(history.medications.is_empty());
        assert!(history.vaccinations.is_empty());
        assert_eq!(history.emergency_contact.name, "Sam");
    }
}
