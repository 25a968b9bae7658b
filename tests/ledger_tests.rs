// tests/ledger_tests.rs
//
// Service-level checks of the attempt ledger and the results aggregator,
// each on its own database.

use exam_desk::{
    db,
    error::AppError,
    services::{answer_key, exams, ledger, results},
};
use sqlx::SqlitePool;

async fn memory_pool() -> SqlitePool {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    db::migrate(&pool).await.unwrap();
    pool
}

async fn seed_teacher(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO teachers (username, password) VALUES (?, 'x') RETURNING id")
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn overwrite_keeps_one_row_with_last_label() {
    let pool = memory_pool().await;
    let teacher = seed_teacher(&pool, "guru").await;
    let exam = exams::create_exam(&pool, teacher, "Quiz").await.unwrap();
    let q1 = answer_key::add_question(&pool, exam.id, "Q1", None, "A").await.unwrap();
    let student = ledger::resolve_student(&pool, "Sari", "sari@school.test", "XII-A")
        .await
        .unwrap();
    let attempt = ledger::create_attempt(&pool, exam.id, student).await.unwrap();

    ledger::record_answer(&pool, attempt, q1, Some("x")).await.unwrap();
    let first_row: i64 = sqlx::query_scalar("SELECT id FROM answers")
        .fetch_one(&pool)
        .await
        .unwrap();

    ledger::record_answer(&pool, attempt, q1, Some("y")).await.unwrap();
    let rows: Vec<(i64, Option<String>)> = sqlx::query_as("SELECT id, chosen FROM answers")
        .fetch_all(&pool)
        .await
        .unwrap();

    assert_eq!(rows, vec![(first_row, Some("y".to_string()))]);

    let listed = ledger::list_answers(&pool, attempt).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].chosen.as_deref(), Some("y"));
}

#[tokio::test]
async fn attempt_for_missing_exam_fails() {
    let pool = memory_pool().await;
    let student = ledger::resolve_student(&pool, "Sari", "sari@school.test", "XII-A")
        .await
        .unwrap();

    let result = ledger::create_attempt(&pool, 404, student).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn zero_question_exam_scores_zero_percent() {
    let pool = memory_pool().await;
    let teacher = seed_teacher(&pool, "guru").await;
    let exam = exams::create_exam(&pool, teacher, "Empty").await.unwrap();
    let student = ledger::resolve_student(&pool, "Sari", "sari@school.test", "XII-A")
        .await
        .unwrap();
    ledger::create_attempt(&pool, exam.id, student).await.unwrap();

    let table = results::aggregate(&pool, exam.id, teacher).await.unwrap();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].score.total, 0);
    assert_eq!(table.rows[0].score.percent, 0);
}

#[tokio::test]
async fn answers_to_another_exams_questions_do_not_count() {
    let pool = memory_pool().await;
    let teacher = seed_teacher(&pool, "guru").await;
    let exam = exams::create_exam(&pool, teacher, "Math").await.unwrap();
    let other = exams::create_exam(&pool, teacher, "Biology").await.unwrap();
    answer_key::add_question(&pool, exam.id, "Q1", None, "A").await.unwrap();
    let foreign = answer_key::add_question(&pool, other.id, "Q1", None, "A").await.unwrap();

    let student = ledger::resolve_student(&pool, "Sari", "sari@school.test", "XII-A")
        .await
        .unwrap();
    let attempt = ledger::create_attempt(&pool, exam.id, student).await.unwrap();
    ledger::record_answer(&pool, attempt, foreign, Some("A")).await.unwrap();

    let table = results::aggregate(&pool, exam.id, teacher).await.unwrap();
    assert_eq!(table.rows[0].score.correct, 0);
    assert_eq!(table.rows[0].score.total, 1);
}

#[tokio::test]
async fn foreign_teacher_gets_not_found() {
    let pool = memory_pool().await;
    let owner = seed_teacher(&pool, "guru_a").await;
    let intruder = seed_teacher(&pool, "guru_b").await;
    let exam = exams::create_exam(&pool, owner, "Quiz").await.unwrap();

    let result = results::aggregate(&pool, exam.id, intruder).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn join_codes_are_unique_and_resolvable() {
    let pool = memory_pool().await;
    let teacher = seed_teacher(&pool, "guru").await;

    let mut codes = std::collections::HashSet::new();
    for i in 0..20 {
        let exam = exams::create_exam(&pool, teacher, &format!("Exam {i}")).await.unwrap();
        assert!(codes.insert(exam.code.clone()));

        let found = exams::find_by_code(&pool, &format!(" {} ", exam.code))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, exam.id);
    }
}

#[tokio::test]
async fn concurrent_writes_keep_one_row_per_slot() {
    let path = std::env::temp_dir().join(format!("exam-desk-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite://{}", path.display());
    let pool = db::connect(&url, 4).await.unwrap();
    db::migrate(&pool).await.unwrap();

    let teacher = seed_teacher(&pool, "guru").await;
    let exam = exams::create_exam(&pool, teacher, "Race").await.unwrap();
    let mut questions = Vec::new();
    for label in ["A", "B", "C"] {
        questions.push(
            answer_key::add_question(&pool, exam.id, "Q", None, label)
                .await
                .unwrap(),
        );
    }
    let student = ledger::resolve_student(&pool, "Sari", "sari@school.test", "XII-A")
        .await
        .unwrap();
    let attempt = ledger::create_attempt(&pool, exam.id, student).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..24 {
        let pool = pool.clone();
        let question = questions[i % questions.len()];
        handles.push(tokio::spawn(async move {
            let label = format!("L{i}");
            ledger::record_answer(&pool, attempt, question, Some(label.as_str())).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let listed = ledger::list_answers(&pool, attempt).await.unwrap();
    assert_eq!(listed.len(), questions.len());
    for (slot, (answer, question)) in listed.iter().zip(&questions).enumerate() {
        assert_eq!(answer.question_id, *question);
        let written: Vec<String> = (0..24)
            .filter(|i| i % questions.len() == slot)
            .map(|i| format!("L{i}"))
            .collect();
        let chosen = answer.chosen.clone().unwrap();
        assert!(written.contains(&chosen), "{chosen} was not written to slot {slot}");
    }

    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}
