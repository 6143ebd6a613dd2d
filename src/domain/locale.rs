//! Localised copy for the landing screen, dialogs and guided prompts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

/// Keys for every localised string the client shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    InvalidEmail,
    InvalidPhone,
    IncompleteCode,
    InvalidDate,
    PastDate,
    InvalidTime,
    SendCodeFailed,
    VerifyCodeFailed,
    CreateBookingFailed,
    ListBookingsFailed,
    AuthTitle,
    AuthPromptInput,
    AuthPromptVerify,
    CodeSentTo,
    DemoCode,
    BookingTitle,
    BookingPrompt,
    BookingCreated,
    BookingFollowUp,
    BookingNeedsAuth,
    BookingFieldsRequired,
    EarliestDate,
    Sending,
    Verifying,
    Loading,
    ConsultationsTitle,
    ConsultationsEmpty,
    LandingTagline,
    LandingPitch,
    SignedIn,
    SignedOut,
    DescriptionTooLong,
    FieldEmail,
    FieldPhone,
    FieldCode,
    FieldDate,
    FieldTime,
    FieldDescription,
    AuthHintsInput,
    AuthHintsVerify,
    BookingHints,
    ConsultationsHints,
    ActionSignIn,
    ActionBook,
    ActionConsultations,
    ActionSignOut,
    ActionQuit,
    MethodPrompt,
    MethodRetry,
    EmailPrompt,
    PhonePrompt,
    CodePrompt,
    DatePrompt,
    TimePrompt,
    DescriptionPrompt,
    AttemptsLeft,
    InputCancelled,
}

impl Locale {
    pub fn text(self, key: Text) -> &'static str {
        match self {
            Self::En => english(key),
            Self::Ru => russian(key),
        }
    }
}

fn english(key: Text) -> &'static str {
    match key {
        Text::InvalidEmail => "Enter a valid email address",
        Text::InvalidPhone => "Enter a valid phone number",
        Text::IncompleteCode => "Enter the full confirmation code",
        Text::InvalidDate => "Enter the date as YYYY-MM-DD",
        Text::PastDate => "Pick today or a later date",
        Text::InvalidTime => "Enter the time as HH:MM",
        Text::SendCodeFailed => "Error sending code",
        Text::VerifyCodeFailed => "Error verifying code",
        Text::CreateBookingFailed => "Error creating booking",
        Text::ListBookingsFailed => "Error loading consultations",
        Text::AuthTitle => "Sign in",
        Text::AuthPromptInput => "Enter your email or phone to receive a code",
        Text::AuthPromptVerify => "Enter the confirmation code",
        Text::CodeSentTo => "Code sent to",
        Text::DemoCode => "Demo code:",
        Text::BookingTitle => "Book a consultation",
        Text::BookingPrompt => "Fill in the form and we will contact you to confirm the time",
        Text::BookingCreated => "Booking created!",
        Text::BookingFollowUp => "We will contact you to confirm the consultation",
        Text::BookingNeedsAuth => "Sign-in is required to book",
        Text::BookingFieldsRequired => "Date and time are required",
        Text::EarliestDate => "Earliest date:",
        Text::Sending => "Sending...",
        Text::Verifying => "Verifying...",
        Text::Loading => "Loading...",
        Text::ConsultationsTitle => "My consultations",
        Text::ConsultationsEmpty => "No consultations yet",
        Text::LandingTagline => "Next-generation IT consulting",
        Text::LandingPitch => "Strategic IT planning and consulting to scale your business.",
        Text::SignedIn => "Signed in",
        Text::SignedOut => "Not signed in",
        Text::DescriptionTooLong => "Description is too long",
        Text::FieldEmail => "email",
        Text::FieldPhone => "phone",
        Text::FieldCode => "code",
        Text::FieldDate => "date",
        Text::FieldTime => "time",
        Text::FieldDescription => "description",
        Text::AuthHintsInput => "Enter: send code | Left/Right: email/phone | Esc: close",
        Text::AuthHintsVerify => "Enter: verify | Ctrl-b: back | Esc: close",
        Text::BookingHints => "Tab: next field | Enter: book | Esc: close",
        Text::ConsultationsHints => "j/k: navigate | r: reload | Esc: close",
        Text::ActionSignIn => "sign in",
        Text::ActionBook => "book a consultation",
        Text::ActionConsultations => "my consultations",
        Text::ActionSignOut => "sign out",
        Text::ActionQuit => "quit",
        Text::MethodPrompt => "Receive the code by [email]/phone: ",
        Text::MethodRetry => "Answer email or phone.",
        Text::EmailPrompt => "Email: ",
        Text::PhonePrompt => "Phone: ",
        Text::CodePrompt => "Code: ",
        Text::DatePrompt => "Date (YYYY-MM-DD): ",
        Text::TimePrompt => "Time (HH:MM): ",
        Text::DescriptionPrompt => "Description (optional): ",
        Text::AttemptsLeft => "Attempts left:",
        Text::InputCancelled => "Input cancelled (EOF). Run consult again to retry.",
    }
}

fn russian(key: Text) -> &'static str {
    match key {
        Text::InvalidEmail => "Введите корректный email адрес",
        Text::InvalidPhone => "Введите корректный номер телефона",
        Text::IncompleteCode => "Введите код подтверждения полностью",
        Text::InvalidDate => "Введите дату в формате ГГГГ-ММ-ДД",
        Text::PastDate => "Выберите сегодняшнюю или более позднюю дату",
        Text::InvalidTime => "Введите время в формате ЧЧ:ММ",
        Text::SendCodeFailed => "Ошибка отправки кода",
        Text::VerifyCodeFailed => "Ошибка проверки кода",
        Text::CreateBookingFailed => "Ошибка создания записи",
        Text::ListBookingsFailed => "Ошибка загрузки записей",
        Text::AuthTitle => "Авторизация",
        Text::AuthPromptInput => "Введите email или телефон для получения кода",
        Text::AuthPromptVerify => "Введите код подтверждения",
        Text::CodeSentTo => "Код отправлен на",
        Text::DemoCode => "Для демонстрации:",
        Text::BookingTitle => "Записаться на консультацию",
        Text::BookingPrompt => "Заполните форму и мы свяжемся с вами для подтверждения времени",
        Text::BookingCreated => "Запись создана!",
        Text::BookingFollowUp => "Мы свяжемся с вами для подтверждения консультации",
        Text::BookingNeedsAuth => "Для записи необходима авторизация",
        Text::BookingFieldsRequired => "Укажите дату и время",
        Text::EarliestDate => "Ближайшая дата:",
        Text::Sending => "Отправка...",
        Text::Verifying => "Проверка...",
        Text::Loading => "Загрузка...",
        Text::ConsultationsTitle => "Мои консультации",
        Text::ConsultationsEmpty => "Записей пока нет",
        Text::LandingTagline => "IT-консалтинг нового поколения",
        Text::LandingPitch => "Стратегическое IT-планирование и консалтинг для масштабирования вашего бизнеса.",
        Text::SignedIn => "Вы вошли",
        Text::SignedOut => "Вы не авторизованы",
        Text::DescriptionTooLong => "Слишком длинное описание",
        Text::FieldEmail => "email",
        Text::FieldPhone => "телефон",
        Text::FieldCode => "код",
        Text::FieldDate => "дата",
        Text::FieldTime => "время",
        Text::FieldDescription => "описание",
        Text::AuthHintsInput => "Enter: отправить код | ←/→: способ | Esc: закрыть",
        Text::AuthHintsVerify => "Enter: подтвердить | Ctrl-b: назад | Esc: закрыть",
        Text::BookingHints => "Tab: следующее поле | Enter: записаться | Esc: закрыть",
        Text::ConsultationsHints => "j/k: навигация | r: обновить | Esc: закрыть",
        Text::ActionSignIn => "войти",
        Text::ActionBook => "записаться на консультацию",
        Text::ActionConsultations => "мои консультации",
        Text::ActionSignOut => "выйти",
        Text::ActionQuit => "закрыть приложение",
        Text::MethodPrompt => "Получить код по [email]/телефону: ",
        Text::MethodRetry => "Ответьте email или телефон.",
        Text::EmailPrompt => "Email: ",
        Text::PhonePrompt => "Телефон: ",
        Text::CodePrompt => "Код: ",
        Text::DatePrompt => "Дата (ГГГГ-ММ-ДД): ",
        Text::TimePrompt => "Время (ЧЧ:ММ): ",
        Text::DescriptionPrompt => "Описание (необязательно): ",
        Text::AttemptsLeft => "Осталось попыток:",
        Text::InputCancelled => "Ввод прерван (EOF). Запустите consult снова, чтобы повторить.",
    }
}
