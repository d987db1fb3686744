use crate::{
    error::FrontError,
    forms::{LoginForm, RegisterForm},
    password, render,
    session::Session,
    FormBody, FrontState,
};
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use axum_extra::extract::{cookie::PrivateCookieJar, WithRejection};
use core_types::NewUser;

/// # GET /
pub async fn index(session: Option<Session>) -> Html<String> {
    let body = match &session {
        Some(session) => format!("<p>Здравствуйте, {}.</p>", render::escape(&session.username)),
        None => "<p>Войдите или зарегистрируйтесь, чтобы продолжить.</p>".to_string(),
    };
    render::page("Учёт промыслового флота", session.as_ref(), &body)
}

/// # GET /register
pub async fn register_page() -> Html<String> {
    let form = render::form(
        "/register",
        &[
            render::input("username", "Логин", "text", true),
            render::input("password", "Пароль", "password", true),
            render::select("role", "Роль", &[("user", "Пользователь"), ("admin", "Администратор")]),
        ],
        "Зарегистрироваться",
    );
    render::page("Регистрация", None, &form)
}

/// # POST /register
pub async fn register(
    State(state): State<FrontState>,
    WithRejection(Form(form), _): FormBody<RegisterForm>,
) -> Result<Redirect, FrontError> {
    form.check()?;
    let role = form.role()?;
    let password_hash = password::hash_in_background(form.password).await?;
    let user = NewUser { username: form.username.trim().to_string(), password_hash, role };
    state.api.create_user(&user).await?;
    tracing::info!(username = %user.username, %role, "User registered.");
    Ok(Redirect::to("/login"))
}

/// # GET /login
pub async fn login_page() -> Html<String> {
    let form = render::form(
        "/login",
        &[
            render::input("username", "Логин", "text", true),
            render::input("password", "Пароль", "password", true),
        ],
        "Войти",
    );
    render::page("Вход", None, &form)
}

/// # POST /login
/// An unknown username and a wrong password are indistinguishable to the caller.
pub async fn login(
    State(state): State<FrontState>,
    jar: PrivateCookieJar,
    WithRejection(Form(form), _): FormBody<LoginForm>,
) -> Result<(PrivateCookieJar, Redirect), FrontError> {
    let username = form.username.trim().to_string();
    let stored = match state.api.get_user(&username).await {
        Ok(stored) => stored,
        Err(e) if e.is_not_found() => {
            tracing::warn!(%username, "Login failed: unknown user.");
            return Err(FrontError::BadCredentials);
        }
        Err(e) => return Err(e.into()),
    };

    if !password::verify_in_background(form.password, stored.password_hash).await? {
        tracing::warn!(%username, "Login failed: wrong password.");
        return Err(FrontError::BadCredentials);
    }

    let session = Session { username, role: stored.role };
    let jar = session.store(jar)?;
    tracing::info!(username = %session.username, role = %session.role, "User logged in.");
    Ok((jar, Redirect::to("/")))
}

/// # GET /logout
pub async fn logout(jar: PrivateCookieJar) -> (PrivateCookieJar, Redirect) {
    (Session::clear(jar), Redirect::to("/login"))
}
