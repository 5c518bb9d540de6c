use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level navigation entries, in menu order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewTab {
    #[default]
    Dashboard,
    Customers,
    Notifications,
    Reports,
    Employees,
    Chat,
}

impl ViewTab {
    pub const ALL: [ViewTab; 6] = [
        ViewTab::Dashboard,
        ViewTab::Customers,
        ViewTab::Notifications,
        ViewTab::Reports,
        ViewTab::Employees,
        ViewTab::Chat,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ViewTab::Dashboard => "dashboard",
            ViewTab::Customers => "customers",
            ViewTab::Notifications => "notifications",
            ViewTab::Reports => "reports",
            ViewTab::Employees => "employees",
            ViewTab::Chat => "chat",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewTab::Dashboard => "Dashboard",
            ViewTab::Customers => "Khách hàng",
            ViewTab::Notifications => "Thông báo",
            ViewTab::Reports => "Báo cáo",
            ViewTab::Employees => "Nhân viên",
            ViewTab::Chat => "Chat Online",
        }
    }

    pub fn parse(value: &str) -> Option<ViewTab> {
        ViewTab::ALL
            .into_iter()
            .find(|tab| tab.id().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for ViewTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
