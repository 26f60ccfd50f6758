use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ChatError, Result};
use crate::quick_action::QuickAction;
use crate::sentiment::Sentiment;

/// Source of reply indices. Production code picks uniformly at random,
/// tests plug in something predictable.
pub trait RandomSource: Send {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

#[derive(Debug, Clone)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuickActionReplies {
    pub peer_mentor: String,
    pub counseling: String,
    pub stress_resources: String,
    pub fallback: String,
}

/// Every canned line the counselor can say.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReplyBook {
    /// Opening line; `{name}` is replaced with the visitor's first name.
    pub greeting: String,
    pub stressed: [String; 3],
    pub sad: [String; 3],
    pub help: [String; 3],
    pub academic: String,
    pub attendance: String,
    pub financial: String,
    pub empathetic: String,
    pub celebratory: String,
    pub default: [String; 3],
    pub resource_offer: String,
    pub quick_actions: QuickActionReplies,
}

impl Default for ReplyBook {
    fn default() -> Self {
        ReplyBook {
            greeting: "Hi {name}! I'm your AI counseling assistant. I'm here to listen and support you through any challenges you're facing. How are you feeling today?".to_string(),
            stressed: [
                "I understand you're feeling stressed. This is completely normal, and you're not alone. Let's work through this together.".to_string(),
                "Here's a quick 5-minute breathing exercise that can help: Take 4 deep breaths, hold for 4 seconds, exhale for 6 seconds. Repeat 3 times.".to_string(),
                "Would you like me to connect you with a peer mentor or suggest some study techniques that might help reduce your stress?".to_string(),
            ],
            sad: [
                "I'm sorry you're feeling this way. Your feelings are valid, and it's okay to have difficult days.".to_string(),
                "Remember that seeking help is a sign of strength, not weakness. Have you considered talking to someone about how you're feeling?".to_string(),
                "Would you like me to schedule a counseling session or connect you with a peer mentor who can offer support?".to_string(),
            ],
            help: [
                "I'm here to help! You can talk to me about academic challenges, personal struggles, or anything that's on your mind.".to_string(),
                "I can also connect you with resources like tutoring, financial aid, counseling services, or peer mentors.".to_string(),
                "What specifically would you like assistance with today?".to_string(),
            ],
            academic: "I understand academic challenges can be overwhelming. Let's break this down together. What specific subject or area are you struggling with? I can connect you with tutoring resources or study groups.".to_string(),
            attendance: "Attendance can be challenging sometimes. What's making it difficult for you to attend classes? Is it health, transportation, motivation, or something else? Let's find solutions together.".to_string(),
            financial: "Financial concerns are a major stressor for many students. Have you explored the financial aid office? I can help you find information about scholarships, grants, and work-study programs available at your college.".to_string(),
            empathetic: "I hear that you're going through a tough time right now. Your feelings are completely valid, and it's okay to not be okay sometimes. What's weighing on your mind the most today?".to_string(),
            celebratory: "That's wonderful to hear! I'm glad you're feeling positive. It's great to celebrate these moments. Is there anything specific that's contributing to your good mood today?".to_string(),
            default: [
                "Thank you for sharing that with me. How can I best support you right now?".to_string(),
                "I'm here to listen and help. What's the most important thing you'd like to work on today?".to_string(),
                "Every challenge is an opportunity to grow. Let's find the right resources to help you succeed.".to_string(),
            ],
            resource_offer: "Would you like me to connect you with a peer mentor, schedule a counseling session, or provide some immediate stress-relief resources?".to_string(),
            quick_actions: QuickActionReplies {
                peer_mentor: "Great! I'm connecting you with Sarah, a senior Computer Science student who has helped many students overcome similar challenges. She'll reach out to you within 24 hours via email.".to_string(),
                counseling: "I've scheduled you for a counseling session with Dr. Martinez tomorrow at 2 PM in the Student Wellness Center (Room 201). You'll receive a confirmation email shortly.".to_string(),
                stress_resources: "Here are some immediate stress-relief resources: 1) 5-minute guided breathing exercise (link sent to your email), 2) Campus meditation room in Library basement, 3) 24/7 crisis support: 1-800-273-8255".to_string(),
                fallback: "I'm here to help with whatever you need. Feel free to ask me anything!".to_string(),
            },
        }
    }
}

impl ReplyBook {
    /// Loads a replacement script from a JSON file shaped like `ReplyBook`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let book: ReplyBook = serde_json::from_str(&raw)?;

        if !book.greeting.contains("{name}") {
            return Err(ChatError::ReplyBook(format!(
                "{}: greeting must contain a {{name}} placeholder",
                path.display()
            )));
        }

        Ok(book)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Responder {
    book: ReplyBook,
}

impl Responder {
    pub fn new(book: ReplyBook) -> Self {
        Responder { book }
    }

    /// Picks the assistant reply for a visitor utterance.
    ///
    /// Topic keywords win over sentiment; the first matching rule is used.
    pub fn generate(&self, text: &str, sentiment: Sentiment, rng: &mut dyn RandomSource) -> String {
        let lower = text.to_lowercase();

        if mentions_any(&lower, &["stressed", "stress"]) {
            return pick(&self.book.stressed, rng);
        }

        if mentions_any(&lower, &["sad", "down", "depressed"]) {
            return pick(&self.book.sad, rng);
        }

        if mentions_any(&lower, &["help", "support"]) {
            return pick(&self.book.help, rng);
        }

        if mentions_any(&lower, &["grade", "gpa", "study"]) {
            return self.book.academic.clone();
        }

        if mentions_any(&lower, &["attendance", "class"]) {
            return self.book.attendance.clone();
        }

        if mentions_any(&lower, &["financial", "money"]) {
            return self.book.financial.clone();
        }

        match sentiment {
            Sentiment::Negative => self.book.empathetic.clone(),
            Sentiment::Positive => self.book.celebratory.clone(),
            Sentiment::Neutral => pick(&self.book.default, rng),
        }
    }

    pub fn resource_offer(&self) -> String {
        self.book.resource_offer.clone()
    }

    /// Canned reply for a quick action; `None` gets the generic fallback.
    pub fn quick_action_reply(&self, action: Option<QuickAction>) -> String {
        let replies = &self.book.quick_actions;
        match action {
            Some(QuickAction::PeerMentor) => replies.peer_mentor.clone(),
            Some(QuickAction::Counseling) => replies.counseling.clone(),
            Some(QuickAction::StressResources) => replies.stress_resources.clone(),
            None => replies.fallback.clone(),
        }
    }

    pub fn greeting(&self, visitor_name: &str) -> String {
        let first_name = visitor_name.split_whitespace().next().unwrap_or("there");
        self.book.greeting.replace("{name}", first_name)
    }
}

fn mentions_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

fn pick(set: &[String], rng: &mut dyn RandomSource) -> String {
    // Clamp in case a source ignores its contract.
    let index = rng.pick(set.len()) % set.len();
    set[index].clone()
}
