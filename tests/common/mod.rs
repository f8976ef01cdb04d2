#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mongodb::bson::{doc, Document};

use mongo_chat::config::QueryConfig;
use mongo_chat::error::{ChatError, Result};
use mongo_chat::llm::ChatModel;
use mongo_chat::store::MemoryStore;
use mongo_chat::Session;

/// Replays canned completions in order; errors once the script runs out.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls:   Arc<AtomicUsize>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<std::result::Result<&str, &str>>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let replies = replies
            .into_iter()
            .map(|r| r.map(str::to_string).map_err(str::to_string))
            .collect();
        (Self { replies: Mutex::new(replies), calls: calls.clone() }, calls)
    }

    pub fn replying(reply: &str) -> (Self, Arc<AtomicUsize>) {
        Self::new(vec![Ok(reply)])
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(e)) => Err(ChatError::Llm(e)),
            None => Err(ChatError::Llm("script exhausted".into())),
        }
    }

    fn label(&self) -> String {
        "scripted".into()
    }
}

pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

fn course(id: &str, name: &str, grade: &str) -> Document {
    doc! { "course_id": id, "course_name": name, "grade": grade }
}

/// The ten-student University seed set.
pub fn students() -> Vec<Document> {
    let calculus = |g| course("CSE 201", "Calculus", g);
    let data_structures = |g| course("CSE 301", "Data Structures", g);
    let discrete = |g| course("CSE 302", "Discrete Mathematics", g);
    let hci = |g| course("CSE 303", "Human Computer Interaction", g);
    let ml = |g| course("CSE 401", "Machine Learning", g);
    let agile = |g| course("CSE 402", "Software Engineering with Agile Practices", g);

    let student = |id: &str, name: &str, major: &str, year: i32, gpa: f64, taken: i32, remaining: i32, courses: Vec<Document>| {
        doc! {
            "student_id": id,
            "name": name,
            "major": major,
            "enrollment_year": year,
            "gpa": gpa,
            "credits_taken": taken,
            "credits_remaining": remaining,
            "courses_completed": courses,
        }
    };

    vec![
        student("S1001", "Alice Johnson", "Computer Science", 2021, 3.8, 95, 25,
            vec![calculus("A"), data_structures("A"), hci("A+"), agile("A")]),
        student("S1002", "Bob Smith", "Information Technology", 2020, 3.1, 110, 10,
            vec![data_structures("B"), discrete("B+"), calculus("A-")]),
        student("S1003", "Charlie Brown", "Software Engineering", 2022, 2.5, 60, 60,
            vec![calculus("A-"), discrete("A")]),
        student("S1004", "Diana Prince", "Computer Science", 2021, 3.9, 88, 32,
            vec![calculus("B+"), ml("B")]),
        student("S1005", "Ethan Hunt", "Cyber Security", 2019, 3.2, 120, 0,
            vec![agile("A"), ml("A-"), hci("B+")]),
        student("S1006", "Fiona Davis", "Data Science", 2023, 3.8, 45, 75,
            vec![calculus("B"), discrete("A")]),
        student("S1007", "George Miller", "Artificial Intelligence", 2020, 3.3, 105, 15,
            vec![data_structures("A"), ml("A-"), agile("B+")]),
        student("S1008", "Hannah Lee", "Information Systems", 2022, 2.9, 72, 48,
            vec![discrete("B+"), hci("A")]),
        student("S1009", "Ian Parker", "Computer Engineering", 2021, 3.6, 90, 30,
            vec![calculus("B"), data_structures("A"), ml("B+")]),
        student("S1010", "Julia Roberts", "Computer Science", 2019, 3.7, 125, 0,
            vec![data_structures("A+"), agile("A"), ml("A-")]),
    ]
}

/// Session over the seeded `Student` collection with a scripted model.
pub async fn student_session(model: ScriptedModel) -> Session {
    let store = MemoryStore::from_documents(students());
    Session::new("Student", Box::new(store), Box::new(model), &QueryConfig::default()).await
}

pub fn names(results: &[serde_json::Map<String, serde_json::Value>]) -> Vec<String> {
    results
        .iter()
        .filter_map(|doc| doc.get("name").and_then(|v| v.as_str()).map(str::to_string))
        .collect()
}
