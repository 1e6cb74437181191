use serde::Serialize;

use crate::errors::DomainError;

/// Post-purchase checks a buyer can ask a garage to perform.
pub const INSPECTION_CHECKS: [&str; 12] = [
    "בדיקת פנסים קדמיים ואחוריים",
    "בדיקת צמיגים ולחץ אוויר",
    "בדיקת מערכת בלמים",
    "בדיקת נוזלי רכב (שמן, מים, בלמים)",
    "בדיקת מצבר ומערכת חשמל",
    "בדיקת מערכת מיזוג אוויר",
    "בדיקת מגבים ונוזל שמשות",
    "בדיקת מערכת היגוי",
    "בדיקת מערכת פליטה",
    "בדיקת חגורות בטיחות",
    "בדיקת מערכת אזעקה ונעילה",
    "בדיקת מערכת ניווט ובידור",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InspectionCheck {
    pub id: usize,
    pub label: &'static str,
}

pub fn inspection_checklist() -> Vec<InspectionCheck> {
    INSPECTION_CHECKS
        .iter()
        .enumerate()
        .map(|(id, label)| InspectionCheck { id, label })
        .collect()
}

/// Keeps the known checks from a selection, deduplicated, in checklist order.
pub fn validate_selection(selected: &[String]) -> Result<Vec<&'static str>, DomainError> {
    let mut unknown = Vec::new();
    for check in selected {
        if !INSPECTION_CHECKS.contains(&check.as_str()) {
            unknown.push(check.as_str());
        }
    }
    if !unknown.is_empty() {
        return Err(DomainError::InvariantViolation(format!(
            "unknown inspection checks: {}",
            unknown.join(", ")
        )));
    }

    let chosen: Vec<&'static str> = INSPECTION_CHECKS
        .iter()
        .copied()
        .filter(|check| selected.iter().any(|value| value == check))
        .collect();
    if chosen.is_empty() {
        return Err(DomainError::InvariantViolation(
            "select at least one inspection check".to_string(),
        ));
    }
    Ok(chosen)
}
