#![cfg(feature = "sqlite")]

use chrono::{TimeZone, Utc};
use jobboard_db::jobs::{count_matching, find_all, find_by_id, find_page, insert_job};
use jobboard_db::{
    create_pool, DbConnectionConfig, DbPool, JobFilter, JobType, NewJob, PageRequest, Predicate,
    SalaryComparison,
};

async fn setup() -> DbPool {
    let pool = create_pool(&DbConnectionConfig::new("sqlite::memory:"))
        .await
        .expect("create pool");
    jobboard_migrations::sqlite_migrator()
        .run(&pool)
        .await
        .expect("migrate");
    pool
}

fn job(title: &str, job_type: JobType, from: Option<&str>, to: Option<&str>) -> NewJob {
    NewJob {
        job_title: title.to_string(),
        company_name: "Acme".to_string(),
        location: "Pune".to_string(),
        job_type,
        salary_from: from.map(str::to_string),
        salary_to: to.map(str::to_string),
        job_description: "Build things".to_string(),
        requirements: "Rust".to_string(),
        responsibilities: "Ship".to_string(),
        application_deadline: Utc.with_ymd_and_hms(2030, 1, 31, 0, 0, 0).unwrap(),
    }
}

fn titles(rows: &[jobboard_db::JobsRow]) -> Vec<&str> {
    rows.iter().map(|r| r.job_title.as_str()).collect()
}

#[tokio::test]
async fn insert_then_find_round_trips() {
    let pool = setup().await;
    let inserted = insert_job(&pool, &job("Engineer", JobType::FullTime, Some("10"), None))
        .await
        .expect("insert");
    assert_eq!(inserted.job_type, "full-time");
    assert_eq!(inserted.application_deadline, "2030-01-31T00:00:00.000Z");
    assert!(inserted.created_at.ends_with('Z'));

    let id = uuid::Uuid::parse_str(&inserted.id).expect("uuid id");
    let found = find_by_id(&pool, &id).await.expect("find").expect("present");
    assert_eq!(found, inserted);

    let missing = find_by_id(&pool, &uuid::Uuid::new_v4()).await.expect("find");
    assert!(missing.is_none());
}

#[tokio::test]
async fn check_constraint_rejects_unknown_job_type() {
    let pool = setup().await;
    let err = sqlx::query(
        "INSERT INTO jobs (id, job_title, company_name, location, job_type, job_description, \
         requirements, responsibilities, application_deadline, created_at) \
         VALUES ('x', 't', 'c', 'l', 'freelance', 'd', 'r', 'r', 'a', 'b')",
    )
    .execute(&pool)
    .await;
    assert!(err.is_err());
}

#[tokio::test]
async fn pages_are_newest_first_and_counted_independently() {
    let pool = setup().await;
    for i in 1..=12 {
        insert_job(&pool, &job(&format!("Job {i}"), JobType::Contract, None, None))
            .await
            .expect("insert");
    }

    let all = Predicate::All;
    let first = find_page(&pool, &all, PageRequest::for_page(1, 5)).await.unwrap();
    assert_eq!(titles(&first), ["Job 12", "Job 11", "Job 10", "Job 9", "Job 8"]);

    let second = find_page(&pool, &all, PageRequest::for_page(2, 5)).await.unwrap();
    assert_eq!(titles(&second), ["Job 7", "Job 6", "Job 5", "Job 4", "Job 3"]);

    let beyond = find_page(&pool, &all, PageRequest::for_page(9, 5)).await.unwrap();
    assert!(beyond.is_empty());
    assert_eq!(count_matching(&pool, &all).await.unwrap(), 12);
}

#[tokio::test]
async fn title_and_type_filters() {
    let pool = setup().await;
    insert_job(&pool, &job("Senior Engineer", JobType::FullTime, None, None)).await.unwrap();
    insert_job(&pool, &job("engineering intern", JobType::Internship, None, None)).await.unwrap();
    insert_job(&pool, &job("Accountant", JobType::Contract, None, None)).await.unwrap();
    insert_job(&pool, &job("100% remote", JobType::Contract, None, None)).await.unwrap();

    let eng = JobFilter {
        job_title: Some("ENG".into()),
        ..Default::default()
    }
    .to_predicate(SalaryComparison::Text);
    let rows = find_all(&pool, &eng).await.unwrap();
    assert_eq!(titles(&rows), ["engineering intern", "Senior Engineer"]);

    let contract = JobFilter {
        job_type: Some("contract".into()),
        ..Default::default()
    }
    .to_predicate(SalaryComparison::Text);
    let rows = find_all(&pool, &contract).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.job_type == "contract"));

    let literal_percent = JobFilter {
        job_title: Some("0%".into()),
        ..Default::default()
    }
    .to_predicate(SalaryComparison::Text);
    let rows = find_all(&pool, &literal_percent).await.unwrap();
    assert_eq!(titles(&rows), ["100% remote"]);
}

#[tokio::test]
async fn salary_range_uses_text_ordering_by_default() {
    let pool = setup().await;
    insert_job(&pool, &job("A", JobType::FullTime, Some("10"), Some("20"))).await.unwrap();
    insert_job(&pool, &job("B", JobType::FullTime, Some("30"), None)).await.unwrap();
    insert_job(&pool, &job("C", JobType::FullTime, None, None)).await.unwrap();

    let min_15 = JobFilter {
        min_salary: Some("15".into()),
        ..Default::default()
    };
    let rows = find_all(&pool, &min_15.to_predicate(SalaryComparison::Text)).await.unwrap();
    assert_eq!(titles(&rows), ["B", "A"]);

    // "20" >= "100" and "30" >= "100" byte-wise, so both still match.
    let min_100 = JobFilter {
        min_salary: Some("100".into()),
        ..Default::default()
    };
    let rows = find_all(&pool, &min_100.to_predicate(SalaryComparison::Text)).await.unwrap();
    assert_eq!(titles(&rows), ["B", "A"]);

    let rows = find_all(&pool, &min_100.to_predicate(SalaryComparison::Numeric)).await.unwrap();
    assert!(rows.is_empty());

    let range = JobFilter {
        min_salary: Some("15".into()),
        max_salary: Some("25".into()),
        ..Default::default()
    };
    let rows = find_all(&pool, &range.to_predicate(SalaryComparison::Numeric)).await.unwrap();
    assert_eq!(titles(&rows), ["A"]);
}

#[tokio::test]
async fn legacy_search_matches_any_text_column() {
    let pool = setup().await;
    let mut by_company = job("Designer", JobType::PartTime, None, None);
    by_company.company_name = "Globex".into();
    insert_job(&pool, &by_company).await.unwrap();
    let mut by_description = job("Writer", JobType::PartTime, None, None);
    by_description.job_description = "Work with the GLOBEX team".into();
    insert_job(&pool, &by_description).await.unwrap();
    insert_job(&pool, &job("Unrelated", JobType::PartTime, None, None)).await.unwrap();

    let rows = find_all(&pool, &Predicate::text_search("globex")).await.unwrap();
    assert_eq!(titles(&rows), ["Writer", "Designer"]);
}

#[tokio::test]
async fn text_matching_folds_non_ascii_case() {
    let pool = setup().await;
    let mut engineer = job("INGÉNIEUR Logiciel", JobType::FullTime, None, None);
    engineer.location = "MÜNCHEN".into();
    insert_job(&pool, &engineer).await.unwrap();
    insert_job(&pool, &job("Other", JobType::FullTime, None, None)).await.unwrap();

    let by_title = JobFilter {
        job_title: Some("ingénieur".into()),
        ..Default::default()
    };
    let rows = find_all(&pool, &by_title.to_predicate(SalaryComparison::Text)).await.unwrap();
    assert_eq!(titles(&rows), ["INGÉNIEUR Logiciel"]);

    let by_location = JobFilter {
        location: Some("München".into()),
        ..Default::default()
    };
    let rows = find_all(&pool, &by_location.to_predicate(SalaryComparison::Text)).await.unwrap();
    assert_eq!(titles(&rows), ["INGÉNIEUR Logiciel"]);

    let rows = find_all(&pool, &Predicate::text_search("münchen")).await.unwrap();
    assert_eq!(titles(&rows), ["INGÉNIEUR Logiciel"]);
}
