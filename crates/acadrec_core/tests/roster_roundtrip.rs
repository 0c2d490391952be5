use acadrec_core::{
    parse_roster, serialize_roster, CodecError, Column, EnrollmentStatus, FlatFileRosterRepository,
    InvalidNumberPolicy, Role, RosterRepository, RosterService, StoreError,
};
use std::path::Path;

const ROSTER: &str = "[USUARIOS]\r\n\
id;nome;email;senha;nivel;curso;turma;idade;np1;np2;pim;media;atividade\r\n\
1;Admin Geral;ADMIN@escola.br;admin123;administrador;ADS;GERAL;40;0;0;0;0;ativo\r\n\
2;Paulo Prof;paulo@escola.br;Prof#1;PROFESSOR;ADS;T1;35;0;0;0;0;ATIVO\r\n\
3;Ana Souza;ana@escola.br;aluno1;ALUNO;ADS;T1;20;8;6;10;1,00;ATIVO\r\n";

fn write_roster(dir: &Path, text: &str) -> FlatFileRosterRepository {
    let path = dir.join("Output").join("SistemaAcademico.csv");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, text).unwrap();
    FlatFileRosterRepository::new(path)
}

#[test]
fn load_normalizes_fields_and_recomputes_average() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_roster(dir.path(), ROSTER).load().unwrap();

    assert_eq!(table.len(), 3);
    let ana = table.find(3).unwrap();
    assert_eq!(ana.name, "ANA SOUZA");
    assert_eq!(ana.role, Role::Student);
    assert_eq!(ana.average, 7.6);

    let admin = table.find(1).unwrap();
    assert_eq!(admin.email, "admin@escola.br");
    assert_eq!(admin.role, Role::Administrator);
    assert_eq!(admin.status, EnrollmentStatus::Active);
    assert_eq!(admin.password, "admin123");
}

#[test]
fn save_writes_comma_decimals_with_crlf() {
    let dir = tempfile::tempdir().unwrap();
    let repo = write_roster(dir.path(), ROSTER);
    let table = repo.load().unwrap();
    repo.save(&table).unwrap();

    let text = std::fs::read_to_string(repo.path()).unwrap();
    assert!(text.starts_with(
        "[USUARIOS]\r\nid;nome;email;senha;nivel;curso;turma;idade;np1;np2;pim;media;atividade\r\n"
    ));
    assert!(text.contains("3;ANA SOUZA;ana@escola.br;aluno1;ALUNO;ADS;T1;20;8,00;6,00;10,00;7,60;ATIVO\r\n"));
    assert!(!text.contains("NaN"));
}

#[test]
fn load_save_load_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let repo = write_roster(dir.path(), ROSTER);
    let first = repo.load().unwrap();
    let reloaded = repo.save(&first).unwrap();
    assert_eq!(reloaded, first);

    let first_text = std::fs::read_to_string(repo.path()).unwrap();
    repo.save(&reloaded).unwrap();
    assert_eq!(std::fs::read_to_string(repo.path()).unwrap(), first_text);
}

#[test]
fn serialized_table_parses_back_to_same_rows() {
    let table = parse_roster(ROSTER, InvalidNumberPolicy::default()).unwrap();
    let again = parse_roster(&serialize_roster(&table), InvalidNumberPolicy::default()).unwrap();
    assert_eq!(again.records(), table.records());
}

#[test]
fn other_sections_are_skipped() {
    let text = format!("[CONFIG]\nversao=2\n\n{ROSTER}[LOG]\n9;x\n");
    let table = parse_roster(&text, InvalidNumberPolicy::CoerceToZero).unwrap();
    let ids: Vec<i64> = table.records().iter().map(|record| record.id).collect();
    assert_eq!(ids, [1, 2, 3]);
}

#[test]
fn missing_marker_reports_format_error_and_empties_service() {
    let dir = tempfile::tempdir().unwrap();
    let repo = write_roster(dir.path(), "id;nome\n1;ANA\n");
    assert!(matches!(
        repo.load().unwrap_err(),
        StoreError::MissingSection { .. }
    ));

    let mut service = RosterService::new(repo);
    assert!(service.reload().is_err());
    assert!(service.full_table().is_empty());
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FlatFileRosterRepository::new(dir.path().join("absent.csv"));
    assert!(matches!(repo.load().unwrap_err(), StoreError::NotFound(_)));
}

#[test]
fn strict_policy_rejects_non_numeric_grades() {
    let dir = tempfile::tempdir().unwrap();
    let text = ROSTER.replace("20;8;6;10", "20;oito;6;10");

    let lenient = write_roster(dir.path(), &text).load().unwrap();
    assert_eq!(lenient.find(3).unwrap().score1, 0.0);

    let strict = write_roster(dir.path(), &text).with_number_policy(InvalidNumberPolicy::Reject);
    match strict.load().unwrap_err() {
        StoreError::Parse { source, .. } => assert_eq!(
            source,
            CodecError::InvalidNumber {
                line: 5,
                column: Column::Score1,
                value: "oito".to_string(),
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn header_only_file_loads_empty_table_with_raw_header() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_roster(dir.path(), "[USUARIOS]\nid;nome;turma\n")
        .load()
        .unwrap();
    assert!(table.records().is_empty());
    assert_eq!(table.header(), ["id", "nome", "turma"]);
    assert!(table.has_column(Column::ClassId));
}
