use exam_core::model::{AnswerMap, Question, QuestionId, Test, TestId};
use services::InMemoryBackend;

struct DemoQuestion {
    prompt: &'static str,
    options: &'static [&'static str],
    correct: &'static str,
}

const GEOGRAPHY: &[DemoQuestion] = &[
    DemoQuestion {
        prompt: "What is the capital of Australia?",
        options: &["Sydney", "Canberra", "Melbourne", "Perth"],
        correct: "Canberra",
    },
    DemoQuestion {
        prompt: "Which is the longest river in Africa?",
        options: &["Congo", "Niger", "Nile", "Zambezi"],
        correct: "Nile",
    },
    DemoQuestion {
        prompt: "Mount Kilimanjaro is located in which country?",
        options: &["Kenya", "Tanzania", "Uganda"],
        correct: "Tanzania",
    },
    DemoQuestion {
        prompt: "Which ocean lies between Africa and Australia?",
        options: &["Atlantic", "Pacific", "Indian", "Arctic"],
        correct: "Indian",
    },
    DemoQuestion {
        prompt: "What is the smallest country by area?",
        options: &["Monaco", "Vatican City", "San Marino", "Liechtenstein"],
        correct: "Vatican City",
    },
];

const QUICK_CHECK: &[DemoQuestion] = &[
    DemoQuestion {
        prompt: "2 + 2 × 2 = ?",
        options: &["6", "8", "4"],
        correct: "6",
    },
    DemoQuestion {
        prompt: "Which of these is a prime number?",
        options: &["21", "27", "29", "33"],
        correct: "29",
    },
];

fn build(
    id: u64,
    title: &str,
    subject: &str,
    minutes: u32,
    questions: &[DemoQuestion],
) -> Result<(Test, AnswerMap), exam_core::Error> {
    let id_base = id * 100;
    let mut key = AnswerMap::new();
    let mut built = Vec::with_capacity(questions.len());
    for (offset, item) in (1..).zip(questions) {
        let question_id = QuestionId::new(id_base + offset);
        built.push(Question::new(
            question_id,
            item.prompt,
            None,
            item.options.iter().map(|option| (*option).to_string()).collect(),
        )?);
        key.set(question_id, item.correct);
    }
    let test = Test::new(TestId::new(id), title, subject, minutes, built)?;
    Ok((test, key))
}

/// Offline backend with two scored tests: a ten-minute quiz (1) and a
/// one-minute check (2) for watching the automatic submission.
pub(crate) fn seeded_backend() -> Result<InMemoryBackend, exam_core::Error> {
    let backend = InMemoryBackend::new();
    for (test, key) in [
        build(1, "World Geography", "Geography", 10, GEOGRAPHY)?,
        build(2, "Quick Check", "Mathematics", 1, QUICK_CHECK)?,
    ] {
        let id = test.id();
        backend.insert_test(test);
        backend.set_answer_key(id, key);
    }
    Ok(backend)
}
