use client_core::{ClientEvent, NoticeLevel, Pager, ValidationErrors};
use shared::protocol::{Employee, User};
use tokio::sync::broadcast;

pub fn user_row(user: &User) -> String {
    format!(
        "{:>5}  {:<24} {:<6} {:<10} {:<8} {:<10} {}",
        user.id,
        user.full_name(),
        user.gender,
        user.phone,
        user.pin,
        user.district,
        user.state
    )
}

pub fn user_detail(user: &User) -> String {
    let mut lines = vec![
        format!("id:            {}", user.id),
        format!("firstname:     {}", user.firstname),
        format!("lastname:      {}", user.lastname),
        format!("gender:        {}", user.gender),
        format!("phone:         {}", user.phone),
        format!("address_line1: {}", user.address_line1),
    ];
    if let Some(line) = user.address_line2.as_deref().filter(|line| !line.is_empty()) {
        lines.push(format!("address_line2: {line}"));
    }
    lines.push(format!("pin:           {}", user.pin));
    lines.push(format!("district:      {}", user.district));
    lines.push(format!("state:         {}", user.state));
    lines.join("\n")
}

pub fn employee_row(employee: &Employee) -> String {
    format!(
        "{:>5}  {:<24} {:<6} {:<12} {}",
        employee.id,
        employee.employee_name,
        employee.employee_id,
        employee.department,
        employee.profile
    )
}

pub fn employee_detail(employee: &Employee) -> String {
    [
        format!("id:            {}", employee.id),
        format!("employee_name: {}", employee.employee_name),
        format!("employee_id:   {}", employee.employee_id),
        format!("department:    {}", employee.department),
        format!("profile:       {}", employee.profile),
    ]
    .join("\n")
}

pub fn pager_line(pager: &Pager) -> String {
    let mut line = format!(
        "page {}/{} ({} total, {} per page)",
        pager.page, pager.last_page, pager.total, pager.page_size
    );
    if !pager.prev_disabled {
        line.push_str("  [prev]");
    }
    if !pager.next_disabled {
        line.push_str("  [next]");
    }
    line
}

pub fn print_field_errors(errors: &ValidationErrors) {
    for (field, message) in errors.iter() {
        eprintln!("  {field}: {message}");
    }
}

/// Prints notices raised since the last drain.
pub fn drain_notices(events: &mut broadcast::Receiver<ClientEvent>) {
    while let Ok(event) = events.try_recv() {
        if let ClientEvent::Notice(notice) = event {
            match notice.level {
                NoticeLevel::Success => println!("{}", notice.message),
                NoticeLevel::Error => eprintln!("{}", notice.message),
            }
        }
    }
}
