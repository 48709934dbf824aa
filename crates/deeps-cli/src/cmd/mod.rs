pub mod replay;
pub mod roster;
pub mod run;

use anyhow::bail;
use deeps_core::patient::Patient;

/// Resolve a patient reference (id like `PX-1234`, or roster index) to a
/// position in the roster.
pub fn select_patient(roster: &[Patient], reference: &str) -> anyhow::Result<usize> {
    if let Some(pos) = roster.iter().position(|p| p.id == reference) {
        return Ok(pos);
    }
    if let Ok(index) = reference.parse::<usize>() {
        if index < roster.len() {
            return Ok(index);
        }
        bail!(
            "roster index {index} out of range (roster holds {} admissions)",
            roster.len()
        );
    }
    bail!("no admission matches '{reference}'; try 'deeps roster'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use deeps_core::roster;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn select_by_index_and_id() {
        let patients = roster::generate(5, &mut StdRng::seed_from_u64(11));
        assert_eq!(select_patient(&patients, "3").unwrap(), 3);
        let id = patients[2].id.clone();
        assert_eq!(select_patient(&patients, &id).unwrap(), 2);
    }

    #[test]
    fn select_rejects_unknown_references() {
        let patients = roster::generate(2, &mut StdRng::seed_from_u64(11));
        assert!(select_patient(&patients, "99").is_err());
        assert!(select_patient(&patients, "PX-0000-nope").is_err());
    }
}
