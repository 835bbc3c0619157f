use ridgeline_core::db::open_db_in_memory;
use ridgeline_core::{
    SqliteTemplateRepository, TemplateCategory, TemplateDraft, TemplateService,
    TemplateServiceError, VariableValues,
};
use uuid::Uuid;

fn values(pairs: &[(&str, Option<&str>)]) -> VariableValues {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.map(str::to_string)))
        .collect()
}

fn stored_template(conn: &rusqlite::Connection, content: &str) -> ridgeline_core::Template {
    let service = TemplateService::new(SqliteTemplateRepository::new(conn));
    service
        .create(TemplateDraft {
            name: "Letter".to_string(),
            description: None,
            category: TemplateCategory::General,
            content: content.to_string(),
            variables: Vec::new(),
        })
        .unwrap()
}

#[test]
fn render_substitutes_supplied_values() {
    let conn = open_db_in_memory().unwrap();
    let template = stored_template(&conn, "Hello {{name}}, your total is {{amount}}");
    let service = TemplateService::new(SqliteTemplateRepository::new(&conn));

    let rendered = service
        .render(
            template.uuid,
            &values(&[("name", Some("Jo")), ("amount", Some("100"))]),
        )
        .unwrap();
    assert_eq!(rendered.content, "Hello Jo, your total is 100");
    assert_eq!(rendered.template_name, "Letter");
}

#[test]
fn missing_value_leaves_placeholder_in_output() {
    let conn = open_db_in_memory().unwrap();
    let template = stored_template(&conn, "Hello {{name}}, your total is {{amount}}");
    let service = TemplateService::new(SqliteTemplateRepository::new(&conn));

    let rendered = service
        .render(template.uuid, &values(&[("name", Some("Jo"))]))
        .unwrap();
    assert_eq!(rendered.content, "Hello Jo, your total is {{amount}}");
}

#[test]
fn null_value_renders_as_empty_string() {
    let conn = open_db_in_memory().unwrap();
    let template = stored_template(&conn, "Phone: {{phone}}.");
    let service = TemplateService::new(SqliteTemplateRepository::new(&conn));

    let rendered = service
        .render(template.uuid, &values(&[("phone", None)]))
        .unwrap();
    assert_eq!(rendered.content, "Phone: .");
}

#[test]
fn whitespace_inside_braces_is_tolerated() {
    let conn = open_db_in_memory().unwrap();
    let template = stored_template(&conn, "Dear {{  investor_name  }},");
    let service = TemplateService::new(SqliteTemplateRepository::new(&conn));

    let rendered = service
        .render(template.uuid, &values(&[("investor_name", Some("Ada"))]))
        .unwrap();
    assert_eq!(rendered.content, "Dear Ada,");
}

#[test]
fn render_unknown_template_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = TemplateService::new(SqliteTemplateRepository::new(&conn));

    let missing = service.render(Uuid::new_v4(), &VariableValues::new());
    assert!(matches!(
        missing,
        Err(TemplateServiceError::TemplateNotFound(_))
    ));
}

#[test]
fn variables_reports_distinct_names() {
    let conn = open_db_in_memory().unwrap();
    let template = stored_template(
        &conn,
        "{{investor_name}} invests in {{project_name}}; regards, {{investor_name}}",
    );
    let service = TemplateService::new(SqliteTemplateRepository::new(&conn));

    let variables = service.variables(template.uuid).unwrap();
    assert_eq!(
        variables,
        vec!["investor_name".to_string(), "project_name".to_string()]
    );
}
