use clap::{Parser, Subcommand};

/// Top-level CLI parser for the `learnify` binary.
#[derive(Debug, Parser)]
#[command(name = "learnify", version, about = "Browse courses and track learning progress")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// SQLite database holding the saved session
    #[arg(
        long = "db",
        global = true,
        env = "LEARNIFY_DB_URL",
        default_value = "sqlite://learnify.sqlite3"
    )]
    pub db_url: String,

    /// Artificial delay applied to login and signup, in milliseconds
    #[arg(long, global = true, env = "LEARNIFY_LATENCY_MS", default_value_t = 0)]
    pub latency_ms: u64,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in with a directory account
    Login {
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Create a student account and sign in
    Signup {
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Forget the saved session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List catalog courses
    Courses {
        #[arg(long)]
        category: Option<String>,
        /// Match against title, description, or instructor
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one course with its lessons
    Course { course_id: String },
    /// Enroll in a course
    Enroll { course_id: String },
    /// Show a lesson
    Lesson { course_id: String, lesson_id: String },
    /// Mark a lesson complete
    Complete { course_id: String, lesson_id: String },
    /// Answer a quiz lesson in one go
    Quiz {
        course_id: String,
        lesson_id: String,
        /// Zero-based option index per question, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        answers: Vec<usize>,
    },
    /// Progress across enrolled courses
    Dashboard,
}
