use eduguard_chat::quick_action::request_text;
use eduguard_chat::{
    classify, ChatError, QuickAction, RandomSource, ReplyBook, Responder, SeededRandom, Sentiment,
};

struct Fixed(usize);

impl RandomSource for Fixed {
    fn pick(&mut self, _len: usize) -> usize {
        self.0
    }
}

#[test]
fn test_negative_words_only() {
    assert_eq!(classify("I feel sad and stressed"), Sentiment::Negative);
    assert_eq!(classify("This assignment is DIFFICULT"), Sentiment::Negative);
}

#[test]
fn test_positive_words_only() {
    assert_eq!(classify("I'm feeling motivated today"), Sentiment::Positive);
    assert_eq!(classify("GREAT news"), Sentiment::Positive);
}

#[test]
fn test_both_lists_cancel_out() {
    assert_eq!(classify("I am good and sad"), Sentiment::Neutral);
}

#[test]
fn test_no_match_is_neutral() {
    assert_eq!(classify("What time is the library open?"), Sentiment::Neutral);
    assert_eq!(classify(""), Sentiment::Neutral);
}

#[test]
fn test_substring_matching_is_kept() {
    // "downtown" contains "down", "goodbye" contains "good"
    assert_eq!(classify("I live downtown"), Sentiment::Negative);
    assert_eq!(classify("goodbye"), Sentiment::Positive);
}

#[test]
fn test_stressed_reply_comes_from_stressed_set() {
    let responder = Responder::default();
    let book = ReplyBook::default();

    for seed in 0..20 {
        let mut rng = SeededRandom::new(seed);
        let reply = responder.generate("I am so stressed", Sentiment::Negative, &mut rng);
        assert!(book.stressed.contains(&reply));
    }
}

#[test]
fn test_injected_source_selects_entry() {
    let responder = Responder::default();
    let book = ReplyBook::default();

    for index in 0..3 {
        let reply = responder.generate("I'm feeling down", Sentiment::Negative, &mut Fixed(index));
        assert_eq!(reply, book.sad[index]);
    }
}

#[test]
fn test_out_of_range_pick_is_clamped() {
    let responder = Responder::default();
    let reply = responder.generate("can you help me", Sentiment::Neutral, &mut Fixed(7));
    assert_eq!(reply, ReplyBook::default().help[1]);
}

#[test]
fn test_academic_rule_beats_sentiment() {
    let responder = Responder::default();
    let text = "I got a good grade in my study plan";
    let reply = responder.generate(text, classify(text), &mut Fixed(0));
    assert_eq!(reply, ReplyBook::default().academic);
}

#[test]
fn test_rule_priority_order() {
    let responder = Responder::default();
    let book = ReplyBook::default();

    // stress outranks help
    let reply = responder.generate("stress, please help", Sentiment::Neutral, &mut Fixed(2));
    assert_eq!(reply, book.stressed[2]);

    // "class" inside "classmates" still routes to attendance
    let reply = responder.generate("my classmates", Sentiment::Neutral, &mut Fixed(0));
    assert_eq!(reply, book.attendance);

    let reply = responder.generate("I have no MONEY left", Sentiment::Neutral, &mut Fixed(0));
    assert_eq!(reply, book.financial);
}

#[test]
fn test_every_topic_keyword_routes_to_its_rule() {
    let responder = Responder::default();
    let book = ReplyBook::default();

    let table: Vec<(&str, &String)> = vec![
        ("stressed", &book.stressed[0]),
        ("stress", &book.stressed[0]),
        ("sad", &book.sad[0]),
        ("down", &book.sad[0]),
        ("depressed", &book.sad[0]),
        ("help", &book.help[0]),
        ("support", &book.help[0]),
        ("grade", &book.academic),
        ("gpa", &book.academic),
        ("study", &book.academic),
        ("attendance", &book.attendance),
        ("class", &book.attendance),
        ("financial", &book.financial),
        ("money", &book.financial),
    ];

    for (keyword, expected) in table {
        let text = format!("Can we talk about {}?", keyword.to_uppercase());
        let reply = responder.generate(&text, Sentiment::Neutral, &mut Fixed(0));
        assert_eq!(&reply, expected, "keyword {:?}", keyword);
    }
}

#[test]
fn test_sentiment_fallbacks() {
    let responder = Responder::default();
    let book = ReplyBook::default();

    let reply = responder.generate("I'm worried", Sentiment::Negative, &mut Fixed(0));
    assert_eq!(reply, book.empathetic);

    let reply = responder.generate("I'm excited", Sentiment::Positive, &mut Fixed(0));
    assert_eq!(reply, book.celebratory);

    let reply = responder.generate("hello there", Sentiment::Neutral, &mut Fixed(1));
    assert_eq!(reply, book.default[1]);
}

#[test]
fn test_greeting_uses_first_name() {
    let responder = Responder::default();
    let greeting = responder.greeting("Alex Johnson");
    assert!(greeting.starts_with("Hi Alex! I'm your AI counseling assistant."));

    assert!(responder.greeting("   ").starts_with("Hi there!"));
}

#[test]
fn test_quick_action_ids() {
    assert_eq!("peer-mentor".parse::<QuickAction>(), Ok(QuickAction::PeerMentor));
    assert_eq!("counseling".parse::<QuickAction>(), Ok(QuickAction::Counseling));
    assert_eq!("stress-resources".parse::<QuickAction>(), Ok(QuickAction::StressResources));
    assert!("tutoring".parse::<QuickAction>().is_err());

    assert_eq!(request_text("peer-mentor"), "I'd like to connect with a peer mentor");
    assert_eq!(request_text("tutoring"), "I'd like to tutoring");
}

#[test]
fn test_quick_action_replies() {
    let responder = Responder::default();
    let book = ReplyBook::default();

    assert_eq!(
        responder.quick_action_reply(Some(QuickAction::Counseling)),
        book.quick_actions.counseling
    );
    assert_eq!(responder.quick_action_reply(None), book.quick_actions.fallback);
}

#[test]
fn test_reply_book_from_json_file() {
    let dir = std::env::temp_dir().join(format!("eduguard-book-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let mut book = ReplyBook::default();
    book.academic = "Tutoring is on the second floor.".to_string();
    let path = dir.join("book.json");
    std::fs::write(&path, serde_json::to_string(&book).unwrap()).unwrap();
    let loaded = ReplyBook::from_json_file(&path).unwrap();
    assert_eq!(loaded, book);

    book.greeting = "Hello!".to_string();
    let bad = dir.join("bad.json");
    std::fs::write(&bad, serde_json::to_string(&book).unwrap()).unwrap();
    assert!(matches!(
        ReplyBook::from_json_file(&bad),
        Err(ChatError::ReplyBook(_))
    ));

    let short = dir.join("short.json");
    std::fs::write(&short, r#"{"greeting": "Hi {name}", "stressed": ["only one"]}"#).unwrap();
    assert!(matches!(
        ReplyBook::from_json_file(&short),
        Err(ChatError::Json(_))
    ));

    std::fs::remove_dir_all(&dir).unwrap();
}
