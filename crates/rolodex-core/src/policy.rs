//! Access policy — the per-action authorization table.
//!
//! The verdict is a pure function of (identity, action). It consults no other
//! state and is evaluated before any read or write delegation.

use serde::{Deserialize, Serialize};

// ─── Identity ────────────────────────────────────────────────────────────────

/// The caller's session classification, resolved by an external collaborator.
/// The core never inspects credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Identity {
  /// No session.
  Guest,
  /// Authenticated, non-administrative.
  User,
  /// Authenticated, administrative. A strict superset of `User` for contact
  /// actions; the distinction only matters elsewhere.
  Admin,
}

// ─── Actions ─────────────────────────────────────────────────────────────────

/// The seven contact actions the policy rules on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAction {
  List,
  Show,
  New,
  Create,
  Edit,
  Update,
  Destroy,
}

// ─── Verdict ─────────────────────────────────────────────────────────────────

/// The outcome of a policy check. `RequireLogin` always resolves to a
/// redirect to the login entry point — never a partial action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
  Allow,
  RequireLogin,
}

/// The authorization table. Reads are public so the directory stays
/// browsable; everything that mutates (or leads to a mutation) needs at
/// least an authenticated user.
pub fn verdict(identity: Identity, action: ContactAction) -> Verdict {
  use ContactAction::*;

  match (identity, action) {
    (_, List | Show) => Verdict::Allow,
    (Identity::Guest, New | Create | Edit | Update | Destroy) => {
      Verdict::RequireLogin
    }
    (Identity::User | Identity::Admin, _) => Verdict::Allow,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL_ACTIONS: [ContactAction; 7] = [
    ContactAction::List,
    ContactAction::Show,
    ContactAction::New,
    ContactAction::Create,
    ContactAction::Edit,
    ContactAction::Update,
    ContactAction::Destroy,
  ];

  #[test]
  fn guests_may_only_browse() {
    for action in ALL_ACTIONS {
      let expected = match action {
        ContactAction::List | ContactAction::Show => Verdict::Allow,
        _ => Verdict::RequireLogin,
      };
      assert_eq!(verdict(Identity::Guest, action), expected, "{action:?}");
    }
  }

  #[test]
  fn users_and_admins_may_do_everything() {
    for identity in [Identity::User, Identity::Admin] {
      for action in ALL_ACTIONS {
        assert_eq!(verdict(identity, action), Verdict::Allow, "{action:?}");
      }
    }
  }
}
