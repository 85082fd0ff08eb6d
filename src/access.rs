// 🔐 Access Control - university users, guarded resources and the registry
//
// A user may open a resource when their access level is at least the
// resource's required level. The registry is generic over what counts as
// a user and what counts as a resource.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{parse_field, GameError, GameResult};
use crate::record::{read_records, write_records, Record};

// ============================================================================
// TRAITS
// ============================================================================

/// Anything that can ask for access
pub trait Principal: fmt::Display {
    fn id(&self) -> i64;

    fn name(&self) -> &str;

    fn access_level(&self) -> i32;
}

/// Anything that can be protected by an access level
pub trait Guarded: fmt::Display {
    fn name(&self) -> &str;

    fn required_access_level(&self) -> i32;

    fn check_access<U: Principal + ?Sized>(&self, user: &U) -> bool {
        user.access_level() >= self.required_access_level()
    }
}

// ============================================================================
// USER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Student { group: String },
    Teacher { department: String },
    Administrator { admin_level: i32 },
}

impl Role {
    pub fn tag(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Student { .. } => "Student",
            Role::Teacher { .. } => "Teacher",
            Role::Administrator { .. } => "Administrator",
        }
    }

    fn validate(&self) -> GameResult<()> {
        match self {
            Role::User => Ok(()),
            Role::Student { group } => non_empty(group, "group"),
            Role::Teacher { department } => non_empty(department, "department"),
            Role::Administrator { admin_level } => non_negative(*admin_level as i64, "admin level"),
        }
    }
}

fn non_empty(value: &str, field: &str) -> GameResult<()> {
    if value.trim().is_empty() {
        return Err(GameError::InvalidArgument(format!("{} cannot be empty", field)));
    }
    Ok(())
}

fn non_negative(value: i64, field: &str) -> GameResult<()> {
    if value < 0 {
        return Err(GameError::InvalidArgument(format!("{} cannot be negative", field)));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    name: String,
    id: i64,
    access_level: i32,
    role: Role,
}

impl User {
    pub fn new(name: impl Into<String>, id: i64, access_level: i32, role: Role) -> GameResult<Self> {
        role.validate()?;
        let mut user = User {
            name: String::new(),
            id: 0,
            access_level: 0,
            role,
        };
        user.set_name(name)?;
        user.set_id(id)?;
        user.set_access_level(access_level)?;
        Ok(user)
    }

    pub fn student(
        name: impl Into<String>,
        id: i64,
        access_level: i32,
        group: impl Into<String>,
    ) -> GameResult<Self> {
        Self::new(name, id, access_level, Role::Student { group: group.into() })
    }

    pub fn teacher(
        name: impl Into<String>,
        id: i64,
        access_level: i32,
        department: impl Into<String>,
    ) -> GameResult<Self> {
        Self::new(
            name,
            id,
            access_level,
            Role::Teacher {
                department: department.into(),
            },
        )
    }

    pub fn administrator(
        name: impl Into<String>,
        id: i64,
        access_level: i32,
        admin_level: i32,
    ) -> GameResult<Self> {
        Self::new(name, id, access_level, Role::Administrator { admin_level })
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> GameResult<()> {
        let name = name.into();
        non_empty(&name, "name")?;
        self.name = name;
        Ok(())
    }

    pub fn set_id(&mut self, id: i64) -> GameResult<()> {
        non_negative(id, "id")?;
        self.id = id;
        Ok(())
    }

    pub fn set_access_level(&mut self, access_level: i32) -> GameResult<()> {
        non_negative(access_level as i64, "access level")?;
        self.access_level = access_level;
        Ok(())
    }

    pub fn set_group(&mut self, group: impl Into<String>) -> GameResult<()> {
        let Role::Student { group: current } = &mut self.role else {
            return Err(GameError::InvalidArgument(format!("{} is not a student", self.name)));
        };
        let group = group.into();
        non_empty(&group, "group")?;
        *current = group;
        Ok(())
    }

    pub fn set_department(&mut self, department: impl Into<String>) -> GameResult<()> {
        let Role::Teacher { department: current } = &mut self.role else {
            return Err(GameError::InvalidArgument(format!("{} is not a teacher", self.name)));
        };
        let department = department.into();
        non_empty(&department, "department")?;
        *current = department;
        Ok(())
    }

    pub fn set_admin_level(&mut self, admin_level: i32) -> GameResult<()> {
        let Role::Administrator { admin_level: current } = &mut self.role else {
            return Err(GameError::InvalidArgument(format!(
                "{} is not an administrator",
                self.name
            )));
        };
        non_negative(admin_level as i64, "admin level")?;
        *current = admin_level;
        Ok(())
    }
}

impl Principal for User {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn access_level(&self) -> i32 {
        self.access_level
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}, ID: {}, Access Level: {}",
            self.role.tag(),
            self.name,
            self.id,
            self.access_level
        )?;
        match &self.role {
            Role::User => Ok(()),
            Role::Student { group } => write!(f, ", Group: {}", group),
            Role::Teacher { department } => write!(f, ", Department: {}", department),
            Role::Administrator { admin_level } => write!(f, ", Admin Level: {}", admin_level),
        }
    }
}

/// `Tag,name,id,level[,extra]`
impl Record for User {
    fn to_record(&self) -> Vec<String> {
        let mut record = vec![
            self.role.tag().to_string(),
            self.name.clone(),
            self.id.to_string(),
            self.access_level.to_string(),
        ];
        match &self.role {
            Role::User => {}
            Role::Student { group } => record.push(group.clone()),
            Role::Teacher { department } => record.push(department.clone()),
            Role::Administrator { admin_level } => record.push(admin_level.to_string()),
        }
        record
    }

    fn from_record(fields: &[&str], line: usize) -> GameResult<Option<Self>> {
        let tag = fields.first().copied().unwrap_or("").trim();
        let expected = match tag {
            "User" => 4,
            "Student" | "Teacher" | "Administrator" => 5,
            _ => return Ok(None),
        };
        if fields.len() != expected {
            return Err(GameError::invalid_data(
                line,
                format!("invalid {} data format: expected {} fields, got {}", tag, expected, fields.len()),
            ));
        }

        let id = parse_field(fields[2], "id", line)?;
        let access_level = parse_field(fields[3], "access level", line)?;
        let role = match tag {
            "User" => Role::User,
            "Student" => Role::Student {
                group: fields[4].to_string(),
            },
            "Teacher" => Role::Teacher {
                department: fields[4].to_string(),
            },
            _ => Role::Administrator {
                admin_level: parse_field(fields[4], "admin level", line)?,
            },
        };

        User::new(fields[1], id, access_level, role)
            .map(Some)
            .map_err(|e| GameError::invalid_data(line, e.to_string()))
    }
}

// ============================================================================
// RESOURCE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    name: String,
    required_access_level: i32,
}

impl Resource {
    pub fn new(name: impl Into<String>, required_access_level: i32) -> GameResult<Self> {
        let name = name.into();
        non_empty(&name, "resource name")?;
        non_negative(required_access_level as i64, "required access level")?;
        Ok(Resource {
            name,
            required_access_level,
        })
    }
}

impl Guarded for Resource {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_access_level(&self) -> i32 {
        self.required_access_level
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Resource: {}, Required Access Level: {}",
            self.name, self.required_access_level
        )
    }
}

/// `name,level`
impl Record for Resource {
    fn to_record(&self) -> Vec<String> {
        vec![self.name.clone(), self.required_access_level.to_string()]
    }

    fn from_record(fields: &[&str], line: usize) -> GameResult<Option<Self>> {
        if fields.len() != 2 {
            return Err(GameError::invalid_data(line, "invalid resource data format"));
        }
        let level = parse_field(fields[1], "required access level", line)?;
        Resource::new(fields[0], level)
            .map(Some)
            .map_err(|e| GameError::invalid_data(line, e.to_string()))
    }
}

// ============================================================================
// ACCESS CONTROL SYSTEM
// ============================================================================

#[derive(Debug)]
pub struct AccessControlSystem<U, R> {
    users: Vec<Arc<U>>,
    resources: Vec<Arc<R>>,
}

impl<U, R> Default for AccessControlSystem<U, R> {
    fn default() -> Self {
        AccessControlSystem {
            users: Vec::new(),
            resources: Vec::new(),
        }
    }
}

impl<U: Principal, R: Guarded> AccessControlSystem<U, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&mut self, user: impl Into<Arc<U>>) {
        let user = user.into();
        tracing::debug!(id = user.id(), name = user.name(), "user added");
        self.users.push(user);
    }

    pub fn add_resource(&mut self, resource: impl Into<Arc<R>>) {
        let resource = resource.into();
        tracing::debug!(name = resource.name(), "resource added");
        self.resources.push(resource);
    }

    pub fn users(&self) -> &[Arc<U>] {
        &self.users
    }

    pub fn resources(&self) -> &[Arc<R>] {
        &self.resources
    }

    pub fn find_user_by_id(&self, id: i64) -> Option<Arc<U>> {
        self.users.iter().find(|u| u.id() == id).cloned()
    }

    pub fn find_resource(&self, name: &str) -> Option<Arc<R>> {
        self.resources.iter().find(|r| r.name() == name).cloned()
    }

    /// Exact name match, in registry order
    pub fn search_users_by_name(&self, name: &str) -> Vec<Arc<U>> {
        self.users
            .iter()
            .filter(|u| u.name() == name)
            .cloned()
            .collect()
    }

    pub fn check_user_access(&self, user_id: i64, resource_name: &str) -> GameResult<bool> {
        let user = self
            .find_user_by_id(user_id)
            .ok_or(GameError::UserNotFound(user_id))?;
        let resource = self
            .find_resource(resource_name)
            .ok_or_else(|| GameError::ResourceNotFound(resource_name.to_string()))?;

        let allowed = resource.check_access(&*user);
        tracing::info!(user = user_id, resource = resource_name, allowed, "access check");
        Ok(allowed)
    }

    /// Ascending; users with equal levels keep their order
    pub fn sort_users_by_access_level(&mut self) {
        self.users.sort_by_key(|u| u.access_level());
    }
}

impl<U: Principal + Record, R: Guarded + Record> AccessControlSystem<U, R> {
    pub fn save(&self, users_path: impl AsRef<Path>, resources_path: impl AsRef<Path>) -> GameResult<()> {
        write_records(users_path.as_ref(), self.users.iter().map(|u| &**u))?;
        write_records(resources_path.as_ref(), self.resources.iter().map(|r| &**r))?;
        tracing::info!(
            users = self.users.len(),
            resources = self.resources.len(),
            "access registry saved"
        );
        Ok(())
    }

    /// Replace both lists with the files' contents. Unknown user types are
    /// skipped; on any error the registry is left as it was.
    pub fn load(&mut self, users_path: impl AsRef<Path>, resources_path: impl AsRef<Path>) -> GameResult<()> {
        let users = read_records::<U>(users_path.as_ref(), 1)?.into_values();
        let resources = read_records::<R>(resources_path.as_ref(), 1)?.into_values();

        self.users = users.into_iter().map(Arc::new).collect();
        self.resources = resources.into_iter().map(Arc::new).collect();
        tracing::info!(
            users = self.users.len(),
            resources = self.resources.len(),
            "access registry loaded"
        );
        Ok(())
    }
}

/// The registry the console menu and the roster viewer start from
pub fn university() -> GameResult<AccessControlSystem<User, Resource>> {
    let mut system = AccessControlSystem::new();

    system.add_user(User::student("Andrey Andreev", 1, 2, "T.RI23")?);
    system.add_user(User::student("Maxim Minimumov", 2, 2, "T.RI22")?);
    system.add_user(User::teacher("Lyubov Podkolzina", 3, 3, "T-University")?);
    system.add_user(User::administrator("Alina Mikhaleva", 4, 5, 1)?);

    system.add_resource(Resource::new("University Library", 1)?);
    system.add_resource(Resource::new("Lab Materials", 3)?);
    system.add_resource(Resource::new("Admin Panel", 5)?);

    Ok(system)
}
