use crate::error::PayPulseError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use paypulse_api_structs::create_reminder::*;
use paypulse_domain::{Reminder, ReminderChannel, ReminderStatus};
use paypulse_infra::PayPulseContext;

pub async fn create_reminder_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<PayPulseContext>,
) -> Result<HttpResponse, PayPulseError> {
    let body = body.0;
    let usecase = CreateReminderUseCase {
        user_id: body.user_id,
        channel: body.channel,
        email: body.email,
        phone: body.phone,
        message: body.message,
        remind_at: body.remind_at,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(PayPulseError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub user_id: String,
    pub channel: ReminderChannel,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub remind_at: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyUserId,
    EmptyMessage,
    MissingEmail,
    MissingPhone,
    StorageError,
}

impl From<UseCaseError> for PayPulseError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyUserId => {
                Self::BadClientData("A non-empty userId is required".into())
            }
            UseCaseError::EmptyMessage => {
                Self::BadClientData("A non-empty message is required".into())
            }
            UseCaseError::MissingEmail => Self::BadClientData(
                "An email address is required when the reminder channel includes email".into(),
            ),
            UseCaseError::MissingPhone => Self::BadClientData(
                "A phone number is required when the reminder channel includes whatsapp".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &PayPulseContext) -> Result<Self::Response, Self::Error> {
        if self.user_id.trim().is_empty() {
            return Err(UseCaseError::EmptyUserId);
        }
        if self.message.trim().is_empty() {
            return Err(UseCaseError::EmptyMessage);
        }
        let wants_email = matches!(self.channel, ReminderChannel::Email | ReminderChannel::Both);
        if wants_email
            && self
                .email
                .as_deref()
                .map_or(true, |email| email.trim().is_empty())
        {
            return Err(UseCaseError::MissingEmail);
        }
        let wants_whatsapp = matches!(
            self.channel,
            ReminderChannel::WhatsApp | ReminderChannel::Both
        );
        if wants_whatsapp
            && self
                .phone
                .as_deref()
                .map_or(true, |phone| phone.trim().is_empty())
        {
            return Err(UseCaseError::MissingPhone);
        }

        // remind_at is taken as-is: it is not checked against "now" here, and
        // delivery does not re-check it either
        let reminder = Reminder {
            id: Default::default(),
            user_id: self.user_id.clone(),
            channel: self.channel,
            email: self.email.clone(),
            phone: self.phone.clone(),
            message: self.message.clone(),
            remind_at: self.remind_at,
            status: ReminderStatus::Pending,
            retry_count: 0,
        };

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}
