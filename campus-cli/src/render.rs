//! Terminal rendering for the page views

use campus_api::{PdfDocument, Student};
use campus_applications::views::{
    Cell, FacultyLoad, LiveSnapshot, MonthGroup, NoticeCard, ProgressView, TimetableGrid,
    NOT_READY_MESSAGE,
};
use campus_applications::NavLink;

pub fn nav(links: &[NavLink]) {
    if links.is_empty() {
        println!("  (no pages for this session)");
    }
    for link in links {
        println!("  {:<18} {}", link.label, link.path);
    }
}

pub fn notice_board(cards: &[NoticeCard]) {
    if cards.is_empty() {
        println!("📭 No upcoming events");
        return;
    }
    for card in cards {
        println!("📌 {} {}  {}", card.day, card.time, card.title);
        if !card.description.is_empty() {
            println!("     {}", card.description);
        }
    }
}

pub fn holidays(months: &[MonthGroup]) {
    if months.is_empty() {
        println!("📭 No holidays found");
    }
    for month in months {
        println!("\n📅 {}", month.label);
        for entry in &month.entries {
            println!("  {}  {:<30} {}", entry.display_date(), entry.name, entry.kind);
        }
    }
}

pub fn students(students: &[Student]) {
    println!("{:<12} {:<28} {:>4} {:>4}", "ID", "Name", "Sem", "Div");
    for student in students {
        println!(
            "{:<12} {:<28} {:>4} {:>4}",
            student.student_id.to_string(),
            student.name,
            student
                .semester
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".into()),
            student.division.as_deref().unwrap_or("-"),
        );
    }
}

pub fn live_attendance(students: &[Student], snapshot: &LiveSnapshot) {
    println!("🔄 Poll #{}", snapshot.polls);
    if let Some(error) = &snapshot.last_error {
        println!("⚠️  {}", error);
    }
    for student in students {
        println!(
            "  {:<12} {:<28} {}",
            student.student_id.to_string(),
            student.name,
            snapshot.status_label(&student.student_id)
        );
    }
}

pub fn progress(view: &ProgressView) {
    match view {
        ProgressView::NotReady { semester } => {
            println!("⏳ Semester {}: {}", semester, NOT_READY_MESSAGE);
        }
        ProgressView::Ready { semester, topics } => {
            println!("📊 Progress report, semester {}", semester);
            for topic in topics {
                println!("\n  {} (average {:.1})", topic.topic, topic.average_marks);
                for mark in &topic.students {
                    println!(
                        "    {:<12} {:<28} {:>6.1}",
                        mark.student_id.to_string(),
                        mark.name,
                        mark.marks
                    );
                }
            }
        }
    }
}

pub fn timetable(grid: &TimetableGrid) {
    if grid.is_empty() {
        println!("📭 Timetable has no periods");
        return;
    }

    print!("{:<14}", "Time");
    for day in grid.days() {
        print!("{:<22}", day.name());
    }
    println!();

    for time in grid.times() {
        print!("{:<14}", time);
        for day in grid.days() {
            let text = match grid.cell(*day, time) {
                Cell::Class(slot) => format!("{} ({})", slot.subject, slot.teacher),
                Cell::Free => "Free".to_string(),
                Cell::Empty => "-".to_string(),
            };
            print!("{:<22}", text);
        }
        println!();
    }
}

pub fn pdfs(documents: &[PdfDocument]) {
    if documents.is_empty() {
        println!("📭 No notes uploaded yet");
    }
    for doc in documents {
        println!("  #{:<5} {:<40} {}", doc.id, doc.title, doc.uploaded_at);
    }
}

pub fn workload(loads: &[FacultyLoad]) {
    println!(
        "{:<24} {:<16} {:>8} {:>5} {:>6}  Status",
        "Faculty", "Department", "Lecture", "Lab", "Total"
    );
    for load in loads {
        println!(
            "{:<24} {:<16} {:>8} {:>5} {:>6}  {}",
            load.name,
            load.department,
            load.lecture_hours,
            load.lab_hours,
            load.total(),
            load.status()
        );
    }
}
