//! Task breakdown planning: classify a task and emit its ordered guided
//! steps.
//!
//! Classification checks the general-help/emotional-struggle keyword set
//! before any assignment keywords, and it wins on any overlap; a cry for
//! help is never treated as a literal task request.
//!
//! Breakdowns are regenerated deterministically from `(input, kind)` on
//! every call. For [`TaskKind::ResilienceHelp`] the leading "Take a Breath"
//! regulation step is decided from the input passed to *this* call, never
//! cached from a prior turn, so escalation and de-escalation both take
//! effect on regeneration.

use crate::rules::RuleConfig;
use serde::{Deserialize, Serialize};

/// The classified kind of an accepted task or support need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// The user needs help getting through, not an assignment plan
    ResilienceHelp,
    /// Compare/contrast assignment
    CompareContrast,
    /// Essay assignment
    Essay,
    /// Reading-response assignment
    ReadingResponse,
    /// Anything else
    General,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::ResilienceHelp => write!(f, "resilience_help"),
            TaskKind::CompareContrast => write!(f, "compare_contrast"),
            TaskKind::Essay => write!(f, "essay"),
            TaskKind::ReadingResponse => write!(f, "reading_response"),
            TaskKind::General => write!(f, "general"),
        }
    }
}

/// One guided step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Short step title
    pub title: String,
    /// What to actually do
    pub description: String,
    /// Whether this step collects an answer from the user
    pub needs_input: bool,
    /// Prompt shown above the input, when `needs_input`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_prompt: Option<String>,
    /// Placeholder text for the input, when `needs_input`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_placeholder: Option<String>,
    /// Checklist items, for steps worked as a list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Vec<String>>,
}

impl Step {
    /// Create a plain step.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            needs_input: false,
            input_prompt: None,
            input_placeholder: None,
            checklist: None,
        }
    }

    /// Make the step collect an answer.
    pub fn with_input(mut self, prompt: impl Into<String>, placeholder: impl Into<String>) -> Self {
        self.needs_input = true;
        self.input_prompt = Some(prompt.into());
        self.input_placeholder = Some(placeholder.into());
        self
    }

    /// Attach a checklist.
    pub fn with_checklist(mut self, items: &[&str]) -> Self {
        self.checklist = Some(items.iter().map(|s| s.to_string()).collect());
        self
    }
}

/// An ordered, typed breakdown of one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBreakdown {
    /// Classified kind
    pub kind: TaskKind,
    /// Tone-setting message shown once at the top
    pub persona_message: String,
    /// How to begin, in one sentence
    pub how_to_start: String,
    /// The ordered steps
    pub steps: Vec<Step>,
}

// Resilience keywords are checked before any assignment keyword and win on
// overlap.
const RESILIENCE_KEYWORDS: &[&str] = &[
    "can't do this",
    "cant do this",
    "give up",
    "too much",
    "overwhelmed",
    "stressed",
    "hate this",
    "crying",
    "panic",
    "freaking out",
    "get through",
    "falling apart",
];

const COMPARE_KEYWORDS: &[&str] = &[
    "compare",
    "contrast",
    "similarities",
    "differences",
    "versus",
    " vs ",
];

const READING_KEYWORDS: &[&str] = &[
    "reading response",
    "respond to the reading",
    "the reading",
    "book report",
    "chapter",
];

const ESSAY_KEYWORDS: &[&str] = &["essay", "paper", "write about", "argument", "persuasive"];

/// Classify a task input into its [`TaskKind`].
pub fn classify(text: &str) -> TaskKind {
    let lower = text.to_lowercase();
    let hit = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if hit(RESILIENCE_KEYWORDS) {
        TaskKind::ResilienceHelp
    } else if hit(COMPARE_KEYWORDS) {
        TaskKind::CompareContrast
    } else if hit(READING_KEYWORDS) {
        TaskKind::ReadingResponse
    } else if hit(ESSAY_KEYWORDS) {
        TaskKind::Essay
    } else {
        TaskKind::General
    }
}

/// Generate the ordered breakdown for `(text, kind)`.
///
/// Deterministic: identical inputs produce identical breakdowns. The rules
/// are consulted only for the overwhelm-marker check on the regulation step.
pub fn generate(text: &str, kind: TaskKind, rules: &RuleConfig) -> TaskBreakdown {
    match kind {
        TaskKind::ResilienceHelp => resilience_help(text, rules),
        TaskKind::CompareContrast => compare_contrast(),
        TaskKind::Essay => essay(),
        TaskKind::ReadingResponse => reading_response(),
        TaskKind::General => general(),
    }
}

fn resilience_help(text: &str, rules: &RuleConfig) -> TaskBreakdown {
    let mut steps = Vec::with_capacity(6);

    // Re-evaluated against the current input on every call.
    if rules.has_overwhelm_marker(&text.to_lowercase()) {
        steps.push(Step::new(
            "Take a Breath",
            "Before anything else: breathe in for four counts, out for six. Twice. \
             Nothing else is required of you during those breaths.",
        ));
    }

    steps.push(
        Step::new(
            "Name the Stuck Point",
            "Say what's in the way in one short sentence. Naming it shrinks it.",
        )
        .with_input(
            "What's the one thing that feels most in the way right now?",
            "e.g. I don't understand the reading",
        ),
    );
    steps.push(Step::new(
        "Shrink the Task",
        "Take whatever the task is and cut it down to the smallest version that still counts.",
    ));
    steps.push(
        Step::new(
            "Pick a Five-Minute Start",
            "Choose one thing you could do in five minutes. Not the best thing. Any thing.",
        )
        .with_input("What's your five-minute start?", "e.g. reread the first page"),
    );
    steps.push(Step::new(
        "Do the Five Minutes",
        "Set a timer. When it rings you're allowed to stop, and you're allowed to keep going.",
    ));
    steps.push(Step::new(
        "Check In With Yourself",
        "How does it feel now compared to before? Either answer is fine. You moved.",
    ));

    TaskBreakdown {
        kind: TaskKind::ResilienceHelp,
        persona_message: "We're not solving the whole thing. We're just getting you moving again."
            .to_string(),
        how_to_start: "Start with the first step below; it takes less than a minute.".to_string(),
        steps,
    }
}

fn compare_contrast() -> TaskBreakdown {
    TaskBreakdown {
        kind: TaskKind::CompareContrast,
        persona_message: "Compare/contrast is really two lists and a decision. We'll build the \
                          lists first."
            .to_string(),
        how_to_start: "Name your two subjects, then everything else is sorting.".to_string(),
        steps: vec![
            Step::new(
                "Pick Your Two Subjects",
                "Write down the two things you're comparing, exactly as the assignment names them.",
            )
            .with_input("What are the two subjects?", "e.g. World War I and World War II"),
            Step::new(
                "List What You Know About Each",
                "Two columns, five facts each. Ugly notes are fine.",
            )
            .with_checklist(&[
                "Five facts about the first subject",
                "Five facts about the second subject",
            ]),
            Step::new(
                "Find the Overlaps",
                "Circle every pair of facts that rhyme with each other. It's like laying two \
                 decks of cards side by side and matching the suits.",
            ),
            Step::new(
                "Find the Differences",
                "Now mark the facts that have no partner in the other column.",
            )
            .with_checklist(&[
                "At least two real similarities",
                "At least two real differences",
            ]),
            Step::new(
                "Choose Your Angle",
                "Decide which matters more for this assignment: how alike they are, or how \
                 different.",
            )
            .with_input("In one sentence, what's your angle?", "e.g. alike in cause, different in scale"),
            Step::new(
                "Draft One Paragraph at a Time",
                "One paragraph per circled pair. Intro and conclusion come last.",
            )
            .with_checklist(&[
                "Intro names both subjects and your angle",
                "One paragraph per point",
                "Conclusion says why the angle matters",
            ]),
        ],
    }
}

fn essay() -> TaskBreakdown {
    TaskBreakdown {
        kind: TaskKind::Essay,
        persona_message: "An essay is one idea wearing paragraphs. We'll find the idea first."
            .to_string(),
        how_to_start: "Say your point out loud before you write anything.".to_string(),
        steps: vec![
            Step::new(
                "Say It Out Loud First",
                "Before writing, say what you want to argue in one spoken sentence.",
            )
            .with_input("In one sentence, what do you want to say?", "e.g. the war changed how ordinary people saw their governments"),
            Step::new(
                "Collect Three Points",
                "Three reasons or examples that back your sentence. Bullet points, not prose.",
            ),
            Step::new(
                "Order Them",
                "Put the strongest point last, the second-strongest first, the weakest in the \
                 middle.",
            ),
            Step::new(
                "Write the Ugly First Draft",
                "One paragraph per point, no editing allowed while drafting.",
            ),
            Step::new(
                "Read It Once and Fix the Worst Bit",
                "Read it through one time and repair only the single worst sentence. Done is done.",
            ),
        ],
    }
}

fn reading_response() -> TaskBreakdown {
    TaskBreakdown {
        kind: TaskKind::ReadingResponse,
        persona_message: "A reading response wants your reaction, not a summary. Your reaction \
                          already exists; we just have to find it."
            .to_string(),
        how_to_start: "Skim for the moment that made you feel something, even boredom.".to_string(),
        steps: vec![
            Step::new(
                "Read With a Pencil",
                "Go through the assigned pages once, marking anything that gets a reaction.",
            ),
            Step::new(
                "Mark Your Reactions",
                "For each mark, jot one word: agree, confusing, unfair, interesting.",
            ),
            Step::new(
                "Pick One Thread",
                "Choose the single mark with the strongest reaction. That's your response.",
            )
            .with_input("Which moment are you responding to?", "e.g. the part where the narrator lies"),
            Step::new(
                "Draft Your Response",
                "What happened, what you thought, and why, a paragraph each.",
            ),
            Step::new(
                "Check It Against the Prompt",
                "Reread the assignment prompt once and confirm you answered what it asked.",
            )
            .with_checklist(&[
                "Names the specific passage",
                "Says what you think, not just what happened",
                "Answers the actual prompt",
            ]),
        ],
    }
}

fn general() -> TaskBreakdown {
    TaskBreakdown {
        kind: TaskKind::General,
        persona_message: "Any task splits into chunks. We'll make the first chunk small enough \
                          to start today."
            .to_string(),
        how_to_start: "Put the task in your own words first.".to_string(),
        steps: vec![
            Step::new(
                "Write Down the Task in Your Own Words",
                "Not the assignment's words, yours. One or two sentences.",
            )
            .with_input("What's the task, in your words?", "e.g. finish the science worksheet"),
            Step::new(
                "Split It Into Three Chunks",
                "Beginning, middle, end, or any three pieces that feel natural.",
            ),
            Step::new(
                "Start the Smallest Chunk",
                "Whichever chunk looks smallest, start it now. Momentum beats order.",
            ),
            Step::new(
                "Mark It Done and Pick the Next",
                "Cross the chunk off somewhere visible, then pick the next smallest.",
            ),
        ],
    }
}
