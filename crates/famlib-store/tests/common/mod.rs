use chrono::{DateTime, TimeZone, Utc};
use famlib_core::diff::ChangeSet;
use famlib_core::digest::digest;
use famlib_core::model::{Family, FamilyVersion, Parameter, Snapshot};

/// Whole-millisecond timestamp so records survive the SQLite round trip unchanged
pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 9, 30, 0).unwrap()
}

#[allow(dead_code)]
pub fn family(name: &str) -> Family {
    Family::new(name, "architecture", at(1))
}

/// Well-formed chain of `count` versions for `family`, pointer included
#[allow(dead_code)]
pub fn linked_chain(family: &mut Family, count: u32) -> Vec<FamilyVersion> {
    let mut chain: Vec<FamilyVersion> = Vec::new();
    for n in 1..=count {
        let previous_hash = chain.last().map(|v| v.hash.clone());
        chain.push(FamilyVersion {
            family_id: family.id.clone(),
            version: n,
            hash: digest(format!("{}-{}", family.name, n).as_bytes()),
            previous_hash,
            artifact_locator: digest(format!("blob-{}-{}", family.name, n).as_bytes()),
            type_catalog_locator: None,
            commit_message: format!("v{}", n),
            published_at: at(n + 1),
            publisher: "tester".to_string(),
            snapshot: Snapshot::new(family.name.clone())
                .with_category("Doors")
                .with_type("900x2100")
                .with_parameter(Parameter::new("Width", (900 + n).to_string())),
            changes: ChangeSet::new(),
        });
    }
    family.current_version = count;
    chain
}
