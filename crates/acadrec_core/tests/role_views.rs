use acadrec_core::{
    authenticate, class_summaries, known_classes, parse_roster, profile_card, project,
    student_classes, AuthError, Column, EnrollmentStatus, InvalidNumberPolicy, RosterTable,
    Session, ViewFilter,
};

const ROSTER: &str = "[USUARIOS]
id;nome;email;senha;nivel;curso;turma;idade;np1;np2;pim;media;atividade
1;ADMIN;admin@escola.br;a;ADMINISTRADOR;ADS;GERAL;40;0;0;0;0;ATIVO
2;CARLA;carla@escola.br;c;COORDENADOR;ADS;GERAL;45;0;0;0;0;ATIVO
3;PAULO;paulo@escola.br;p;PROFESSOR;ADS;T1;35;0;0;0;0;ATIVO
4;ANA;ana@escola.br;s1;ALUNO;ADS;T1;20;8;6;10;0;ATIVO
5;BRUNO;bruno@escola.br;s2;ALUNO;ADS;T1;21;5;5;5;0;INATIVO
6;CAIO;caio@escola.br;s3;ALUNO;GTI;T2;22;10;9;7;0;ATIVO
7;REGISTRO_T3;turma_t3@sys.com;;DUMMY;N/A;T3;0;0;0;0;0;INATIVO
";

fn roster() -> RosterTable {
    parse_roster(ROSTER, InvalidNumberPolicy::CoerceToZero).unwrap()
}

fn login(table: &RosterTable, email: &str, password: &str) -> Session {
    authenticate(table, email, password).unwrap()
}

fn ids(table: &RosterTable) -> Vec<i64> {
    table.records().iter().map(|record| record.id).collect()
}

#[test]
fn student_projection_contains_only_own_row() {
    let table = roster();
    for (email, password, id) in [
        ("ana@escola.br", "s1", 4),
        ("bruno@escola.br", "s2", 5),
        ("caio@escola.br", "s3", 6),
    ] {
        let session = login(&table, email, password);
        let view = project(&table, &session, &ViewFilter::default()).unwrap();
        assert_eq!(ids(&view), [id]);
        assert!(!view.has_column(Column::Email));
        assert!(view.has_column(Column::Average));
    }
}

#[test]
fn projections_match_role_table() {
    let table = roster();

    let teacher = login(&table, "PAULO", "p");
    let view = project(&table, &teacher, &ViewFilter::default()).unwrap();
    assert_eq!(ids(&view), [4, 5, 6]);

    let coordinator = login(&table, "carla@escola.br", "c");
    let view = project(&table, &coordinator, &ViewFilter::default()).unwrap();
    assert_eq!(ids(&view), [2, 3, 4, 5, 6]);
    assert!(!view.has_column(Column::Score1));

    let admin = login(&table, "admin@escola.br", "a");
    let view = project(&table, &admin, &ViewFilter::default()).unwrap();
    assert_eq!(ids(&view), [1, 2, 3, 4, 5, 6, 7]);
    assert!(!view.has_column(Column::Password));
}

#[test]
fn projecting_twice_changes_nothing() {
    let table = roster();
    let teacher = login(&table, "paulo@escola.br", "p");
    let filter = ViewFilter::by_status(EnrollmentStatus::Active);
    let once = project(&table, &teacher, &filter).unwrap();
    let twice = project(&once, &teacher, &filter).unwrap();
    assert_eq!(once, twice);
    assert_eq!(ids(&once), [4, 6]);
}

#[test]
fn filters_on_hidden_columns_find_nothing() {
    let table = roster();
    let coordinator = login(&table, "carla@escola.br", "c");
    let view = project(&table, &coordinator, &ViewFilter::by_column("NP1", "8")).unwrap();
    assert!(view.records().is_empty());

    let view = project(&table, &coordinator, &ViewFilter::by_column("CURSO", "gt")).unwrap();
    assert_eq!(ids(&view), [6]);
}

#[test]
fn placeholder_rows_cannot_log_in() {
    let table = roster();
    assert!(matches!(
        authenticate(&table, "turma_t3@sys.com", ""),
        Err(AuthError::RoleNotPermitted(_))
    ));
}

#[test]
fn class_views_aggregate_students() {
    let table = roster();
    let summaries = class_summaries(&table, None);
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].class_id, "T1");
    assert_eq!(summaries[0].students, 2);
    assert_eq!(summaries[0].mean_average, 6.3);
    assert_eq!(summaries[1].course, "GTI");

    assert_eq!(student_classes(&table), ["T1", "T2"]);
    assert_eq!(known_classes(&table), ["T1", "T2", "T3"]);
}

#[test]
fn coordinator_profile_card_hides_grades() {
    let table = roster();
    let coordinator = login(&table, "carla@escola.br", "c");
    assert!(profile_card(&coordinator)
        .iter()
        .all(|(column, _)| *column != Column::Average));

    let student = login(&table, "ana@escola.br", "s1");
    let card = profile_card(&student);
    assert!(card.contains(&(Column::Average, "7.60".to_string())));
}
