use ion_prefixlist::core::grouper;
use ion_prefixlist::IonError;
use std::io::Write;
use std::path::Path;

#[test]
fn test_documented_example_file_loads_three_definitions() {
    let mut csv_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        csv_file,
        "target_sites,prefixlist_name,prefixes,ge,le\n\
         \"EMEA DC,NAM DC\",SiteA-Allow,192.168.1.0/24,,\n\
         ,,10.10.0.0/16,,\n\
         ,,172.16.5.0/24,,\n\
         \"EMEA DC,NAM DC\",SiteB-Block,192.168.100.0/24,28,32\n\
         ,,10.20.0.0/16,,\n\
         NAM DC,SiteC-Specific,203.0.113.0/24,,\n"
    )
    .unwrap();

    let definitions = grouper::load_definitions(csv_file.path()).unwrap();
    assert_eq!(definitions.len(), 3);
    assert_eq!(definitions[0].entries.len(), 3);
    assert_eq!(definitions[1].entries.len(), 2);
    assert_eq!(definitions[2].entries.len(), 1);
    assert_eq!(definitions[2].target_sites, vec!["NAM DC"]);
}

#[test]
fn test_file_with_utf8_bom_loads() {
    let mut csv_file = tempfile::NamedTempFile::new().unwrap();
    csv_file.write_all("\u{feff}".as_bytes()).unwrap();
    write!(
        csv_file,
        "target_sites,prefixlist_name,prefixes,ge,le\n\
         NAM DC,SiteC-Specific,203.0.113.0/24,,\n"
    )
    .unwrap();

    let definitions = grouper::load_definitions(csv_file.path()).unwrap();
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].name, "SiteC-Specific");
}

#[test]
fn test_missing_file_is_an_io_error() {
    let err = grouper::load_definitions(Path::new("/no/such/input.csv")).unwrap_err();
    assert!(matches!(err, IonError::IoError(_)));
}

#[test]
fn test_malformed_file_aborts_with_row_context() {
    let mut csv_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        csv_file,
        "target_sites,prefixlist_name,prefixes,ge,le\n\
         NAM DC,SiteC-Specific,203.0.113.0/24,,\n\
         ,SiteD-Orphan,10.0.0.0/8,,\n"
    )
    .unwrap();

    let err = grouper::load_definitions(csv_file.path()).unwrap_err();
    match err {
        IonError::ConfigError { row, .. } => assert_eq!(row, 3),
        other => panic!("expected ConfigError, got {:?}", other),
    }
}
